// 地形生成模块

pub mod biome;
pub mod blur;
pub mod grid;
pub mod heightmap;
pub mod mesh;
pub mod noise;
pub mod range;

pub use biome::*;
pub use blur::*;
pub use grid::*;
pub use heightmap::*;
pub use mesh::*;
pub use noise::*;
pub use range::*;
