use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};

/// Closed numeric interval `[min, max]`
///
/// Serialized as a `[min, max]` pair; deserialization goes through [`RangeModel::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f32, f32)", into = "(f32, f32)")]
pub struct RangeModel {
    min: f32,
    max: f32,
}

impl RangeModel {
    /// Create a new range, rejecting `min > max` and NaN bounds
    pub fn new(min: f32, max: f32) -> Result<Self> {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(TerrainError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Inclusive membership test
    pub fn fits(&self, value: f32) -> bool {
        self.min <= value && value <= self.max
    }
}

impl TryFrom<(f32, f32)> for RangeModel {
    type Error = TerrainError;

    fn try_from((min, max): (f32, f32)) -> Result<Self> {
        Self::new(min, max)
    }
}

impl From<RangeModel> for (f32, f32) {
    fn from(range: RangeModel) -> Self {
        (range.min, range.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_is_inclusive() {
        let range = RangeModel::new(0.2, 0.4).unwrap();
        assert!(range.fits(0.2));
        assert!(range.fits(0.3));
        assert!(range.fits(0.4));
        assert!(!range.fits(0.19));
        assert!(!range.fits(0.41));
    }

    #[test]
    fn test_degenerate_range_holds_single_value() {
        let range = RangeModel::new(0.5, 0.5).unwrap();
        assert!(range.fits(0.5));
        assert!(!range.fits(0.500_1));
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let err = RangeModel::new(1.0, 0.0).unwrap_err();
        assert!(matches!(err, TerrainError::InvalidRange { .. }));
    }

    #[test]
    fn test_nan_bound_is_rejected() {
        assert!(RangeModel::new(f32::NAN, 1.0).is_err());
        assert!(RangeModel::new(0.0, f32::NAN).is_err());
    }

    #[test]
    fn test_deserialize_validates_bounds() {
        let ok: RangeModel = serde_json::from_str("[0.1, 0.9]").unwrap();
        assert_eq!(ok, RangeModel::new(0.1, 0.9).unwrap());

        let bad = serde_json::from_str::<RangeModel>("[0.9, 0.1]");
        assert!(bad.is_err());
    }

    #[test]
    fn test_nan_never_fits() {
        let range = RangeModel::new(0.0, 1.0).unwrap();
        assert!(!range.fits(f32::NAN));
    }
}
