#![warn(clippy::all, rust_2018_idioms)]

pub mod error;
pub mod terrain;

pub use error::{Result, TerrainError};
