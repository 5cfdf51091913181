//! Elevation bands and biome colouring of height grids.

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use super::grid::{image_dimensions, Grid};
use super::range::RangeModel;
use crate::error::Result;

/// A named elevation band with its display colour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeModel {
    pub name: String,
    pub height_range: RangeModel,
    pub color: [u8; 3],
}

impl BiomeModel {
    pub fn new(name: impl Into<String>, height_range: RangeModel, color: [u8; 3]) -> Self {
        Self {
            name: name.into(),
            height_range,
            color,
        }
    }
}

/// Ordered biome list; lookups return the first band that fits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeTable {
    biomes: Vec<BiomeModel>,
    /// Colour for values no band covers (magenta, like a missing texture)
    #[serde(default = "default_fallback")]
    fallback: [u8; 3],
}

fn default_fallback() -> [u8; 3] {
    [255, 0, 255]
}

impl BiomeTable {
    pub fn new(biomes: Vec<BiomeModel>) -> Self {
        Self {
            biomes,
            fallback: default_fallback(),
        }
    }

    pub fn with_fallback(mut self, color: [u8; 3]) -> Self {
        self.fallback = color;
        self
    }

    /// Deep water -> shallow water -> beach -> grass -> rock -> snow over `[0, 1]`
    pub fn default_table() -> Result<Self> {
        Ok(Self::new(vec![
            BiomeModel::new("deep_water", RangeModel::new(0.0, 0.3)?, [12, 31, 64]),
            BiomeModel::new("shallow_water", RangeModel::new(0.3, 0.4)?, [40, 122, 184]),
            BiomeModel::new("sand", RangeModel::new(0.4, 0.45)?, [190, 184, 139]),
            BiomeModel::new("grass", RangeModel::new(0.45, 0.65)?, [90, 156, 78]),
            BiomeModel::new("rock", RangeModel::new(0.65, 0.85)?, [128, 102, 77]),
            BiomeModel::new("snow", RangeModel::new(0.85, 1.0)?, [242, 242, 242]),
        ]))
    }

    pub fn biomes(&self) -> &[BiomeModel] {
        &self.biomes
    }

    pub fn classify(&self, value: f32) -> Option<&BiomeModel> {
        self.biomes.iter().find(|b| b.height_range.fits(value))
    }

    pub fn color_of(&self, value: f32) -> [u8; 3] {
        self.classify(value).map_or(self.fallback, |b| b.color)
    }

    /// Paint every grid cell with the colour of its biome
    pub fn colorize(&self, grid: &Grid<f32>) -> Result<RgbImage> {
        let (width, height) = image_dimensions(grid.width(), grid.height())?;
        Ok(RgbImage::from_fn(width, height, |x, y| {
            Rgb(self.color_of(grid.get(x as usize, y as usize)))
        }))
    }
}
