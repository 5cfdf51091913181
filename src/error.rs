//! Error taxonomy shared by every terrain operation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TerrainError>;

#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("invalid grid dimensions {width}x{height}: both must be greater than zero")]
    InvalidDimension { width: usize, height: usize },

    #[error("invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: f32, max: f32 },

    #[error("invalid kernel size {0}: must be odd and positive")]
    InvalidKernelSize(usize),

    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("lattice has {actual} values, expected {expected}")]
    LatticeSize { expected: usize, actual: usize },

    #[error("failed to read configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
