//! 高度图生成
//!
//! Seeded lattice -> fractal noise -> `[0, 1]` remap with power curve -> Gaussian smoothing.

use std::fs;
use std::path::Path;
use std::time::Instant;

use image::{ImageFormat, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use super::blur::{blur_grid, blur_image, BlurConfig};
use super::grid::{check_dimensions, image_dimensions, Grid};
use super::noise::{NoiseConfig, NoiseGenerator, NoiseLattice};
use crate::error::{Result, TerrainError};

/// Full set of generation parameters; generation is a pure function of this struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightmapConfig {
    pub width: usize,
    pub height: usize,
    pub noise: NoiseConfig,
    /// Contrast exponent applied after remapping to `[0, 1]`;
    /// above 1 pushes values down, below 1 lifts them
    pub power: f32,
    pub blur: BlurConfig,
}

impl Default for HeightmapConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            noise: NoiseConfig::default(),
            power: 0.9,
            blur: BlurConfig::default(),
        }
    }
}

impl HeightmapConfig {
    pub fn new(width: usize, height: usize, noise: NoiseConfig) -> Self {
        Self {
            width,
            height,
            noise,
            ..Default::default()
        }
    }

    pub fn with_power(mut self, power: f32) -> Self {
        self.power = power;
        self
    }

    pub fn with_blur(mut self, blur: BlurConfig) -> Self {
        self.blur = blur;
        self
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.width, self.height)?;
        self.noise.validate()?;
        if !(self.power.is_finite() && self.power > 0.0) {
            return Err(TerrainError::InvalidParameter {
                name: "power",
                value: self.power as f64,
            });
        }
        // Builds and discards the kernel; surfaces bad sigma before any noise work
        self.blur.kernel()?;
        Ok(())
    }
}

/// Map a fractal value from `[-1, 1]` to `[0, 1]` and apply the power curve
#[inline]
pub fn remap(value: f32, power: f32) -> f32 {
    (value * 0.5 + 0.5).powf(power)
}

/// Quantize a `[0, 1]` value to an 8-bit intensity
#[inline]
pub fn quantize(value: f32) -> u8 {
    ((value * 255.0) as i32).clamp(0, 255) as u8
}

/// Produces elevation grids and grayscale heightmap images from one configuration
pub struct HeightmapPipeline {
    config: HeightmapConfig,
    generator: NoiseGenerator,
}

impl HeightmapPipeline {
    pub fn new(config: HeightmapConfig) -> Result<Self> {
        config.validate()?;
        let generator = NoiseGenerator::new(config.noise.clone(), config.width, config.height)?;
        Ok(Self { config, generator })
    }

    /// Run the pipeline over a known lattice; its dimensions must match the config
    pub fn with_lattice(config: HeightmapConfig, lattice: NoiseLattice) -> Result<Self> {
        config.validate()?;
        if lattice.width() != config.width || lattice.height() != config.height {
            return Err(TerrainError::LatticeSize {
                expected: config.width * config.height,
                actual: lattice.width() * lattice.height(),
            });
        }
        let generator = NoiseGenerator::with_lattice(config.noise.clone(), lattice)?;
        Ok(Self { config, generator })
    }

    pub fn config(&self) -> &HeightmapConfig {
        &self.config
    }

    pub fn lattice(&self) -> &NoiseLattice {
        self.generator.lattice()
    }

    /// Fractal values before remapping, in `[-1, 1]`
    pub fn raw_matrix(&self) -> Result<Grid<f32>> {
        self.generator.generate_grid()
    }

    /// Remapped values before smoothing, in `[0, 1]`
    pub fn remapped_matrix(&self) -> Result<Grid<f32>> {
        let power = self.config.power;
        self.generator.generate_grid_with(|v| remap(v, power))
    }

    /// Smoothed elevation grid, values in `[0, 1]`
    pub fn noise_matrix(&self) -> Result<Grid<f32>> {
        let start = Instant::now();
        let remapped = self.remapped_matrix()?;
        let smoothed = blur_grid(&remapped, &self.config.blur.kernel()?)?;
        log::debug!(
            "noise matrix {}x{} generated in {:?}",
            self.config.width,
            self.config.height,
            start.elapsed()
        );
        Ok(smoothed)
    }

    /// Smoothed 8-bit grayscale heightmap; quantization happens before smoothing
    pub fn noise_map(&self) -> Result<RgbImage> {
        let start = Instant::now();
        let (width, height) = image_dimensions(self.config.width, self.config.height)?;
        let remapped = self.remapped_matrix()?;

        let mut image = RgbImage::new(width, height);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            let v = quantize(remapped.get(x as usize, y as usize));
            *pixel = Rgb([v, v, v]);
        }

        let smoothed = blur_image(&image, &self.config.blur.kernel()?)?;
        log::debug!(
            "noise map {}x{} generated in {:?}",
            self.config.width,
            self.config.height,
            start.elapsed()
        );
        Ok(smoothed)
    }
}

/// Write an image as PNG
pub fn save_png(image: &RgbImage, path: impl AsRef<Path>) -> Result<()> {
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// One-shot helper: validated config in, elevation grid out
pub fn generate_heightmap(config: &HeightmapConfig) -> Result<Grid<f32>> {
    HeightmapPipeline::new(config.clone())?.noise_matrix()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(seed: u64) -> HeightmapConfig {
        HeightmapConfig::new(32, 24, NoiseConfig::new(seed, 0.1, 1.0, 0.5, 4))
            .with_blur(BlurConfig::new(2, 1.0))
    }

    #[test]
    fn test_same_config_produces_same_heights() {
        let a = generate_heightmap(&small_config(12345)).unwrap();
        let b = generate_heightmap(&small_config(12345)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = generate_heightmap(&small_config(1)).unwrap();
        let b = generate_heightmap(&small_config(2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_matrix_dimensions_match_config() {
        let grid = generate_heightmap(&small_config(3)).unwrap();
        assert_eq!(grid.width(), 32);
        assert_eq!(grid.height(), 24);
    }

    #[test]
    fn test_value_ranges() {
        let pipeline = HeightmapPipeline::new(small_config(8)).unwrap();

        let (raw_min, raw_max) = pipeline.raw_matrix().unwrap().min_max();
        assert!(raw_min >= -1.0 && raw_max <= 1.0);

        let (min, max) = pipeline.noise_matrix().unwrap().min_max();
        assert!(min >= 0.0 && max <= 1.0 + 1e-6, "matrix spans [{}, {}]", min, max);
    }

    #[test]
    fn test_remap_and_power_curve() {
        assert_eq!(remap(-1.0, 1.0), 0.0);
        assert_eq!(remap(1.0, 1.0), 1.0);
        assert_eq!(remap(0.0, 1.0), 0.5);
        // power > 1 compresses low values, power < 1 lifts them
        assert!(remap(0.0, 2.0) < 0.5);
        assert!(remap(0.0, 0.5) > 0.5);
    }

    #[test]
    fn test_quantize_clamps() {
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(1.0), 255);
        assert_eq!(quantize(0.5), 127);
        assert_eq!(quantize(1.5), 255);
        assert_eq!(quantize(-0.2), 0);
    }

    #[test]
    fn test_noise_map_is_grayscale() {
        let pipeline = HeightmapPipeline::new(small_config(21)).unwrap();
        let image = pipeline.noise_map().unwrap();
        assert_eq!(image.dimensions(), (32, 24));
        for pixel in image.pixels() {
            let [r, g, b] = pixel.0;
            assert_eq!(r, g);
            assert_eq!(g, b);
        }
    }

    #[test]
    fn test_noise_map_tracks_matrix() {
        let pipeline = HeightmapPipeline::new(small_config(34)).unwrap();
        let matrix = pipeline.noise_matrix().unwrap();
        let image = pipeline.noise_map().unwrap();
        for (x, y, pixel) in image.enumerate_pixels() {
            let expected = matrix.get(x as usize, y as usize) * 255.0;
            // quantize-then-blur vs blur-then-scale differ by truncation only
            assert!(
                (pixel.0[0] as f32 - expected).abs() <= 2.5,
                "pixel {} vs {} at ({}, {})",
                pixel.0[0],
                expected,
                x,
                y
            );
        }
    }

    #[test]
    fn test_invalid_configs() {
        let mut config = small_config(1);
        config.width = 0;
        assert!(matches!(
            HeightmapPipeline::new(config),
            Err(TerrainError::InvalidDimension { .. })
        ));

        let config = small_config(1).with_power(0.0);
        assert!(matches!(
            HeightmapPipeline::new(config),
            Err(TerrainError::InvalidParameter { name: "power", .. })
        ));

        let config = small_config(1).with_blur(BlurConfig::new(2, -1.0));
        assert!(HeightmapPipeline::new(config).is_err());
    }

    #[test]
    fn test_lattice_must_match_dimensions() {
        let lattice = NoiseLattice::generate(1, 8, 8).unwrap();
        let result = HeightmapPipeline::with_lattice(small_config(1), lattice);
        assert!(matches!(result, Err(TerrainError::LatticeSize { .. })));
    }

    #[test]
    fn test_missing_config_file_is_io_error() {
        let result = HeightmapConfig::from_json_file("/nonexistent/heightmap.json");
        assert!(matches!(result, Err(TerrainError::Io(_))));
    }

    #[test]
    fn test_config_file_loads() {
        let path = std::env::temp_dir().join("heightfield_config_test.json");
        fs::write(&path, r#"{ "height": 12, "power": 1.5 }"#).unwrap();
        let config = HeightmapConfig::from_json_file(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.height, 12);
        assert_eq!(config.power, 1.5);
        assert_eq!(config.width, 100);
    }

    #[test]
    fn test_save_png_writes_file() {
        let pipeline = HeightmapPipeline::new(small_config(5)).unwrap();
        let path = std::env::temp_dir().join("heightfield_save_test.png");
        save_png(&pipeline.noise_map().unwrap(), &path).unwrap();
        let bytes = fs::read(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_config_round_trips_through_json_with_defaults() {
        let config: HeightmapConfig =
            serde_json::from_str(r#"{ "width": 64, "noise": { "seed": 7 } }"#).unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.height, 100);
        assert_eq!(config.noise.seed, 7);
        assert_eq!(config.noise.octaves, 4);
        assert_eq!(config.power, 0.9);
        assert_eq!(config.blur, BlurConfig::default());
    }
}
