//! Gaussian smoothing of elevation grids and RGB images.
//!
//! Both forms convolve with the same normalized kernel and clamp samples at
//! the borders instead of wrapping.

use image::RgbImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::grid::{check_dimensions, Grid};
use crate::error::{Result, TerrainError};

/// Smoothing parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurConfig {
    /// Kernel half-width; the kernel covers `2 * radius + 1` cells per axis
    pub radius: usize,
    /// Standard deviation of the Gaussian
    pub sigma: f32,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            radius: 10,
            sigma: 2.6,
        }
    }
}

impl BlurConfig {
    pub fn new(radius: usize, sigma: f32) -> Self {
        Self { radius, sigma }
    }

    pub fn kernel(&self) -> Result<GaussianKernel> {
        GaussianKernel::from_radius(self.radius, self.sigma)
    }
}

/// Square Gaussian kernel whose weights sum to one
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKernel {
    size: usize,
    weights: Vec<f32>,
}

impl GaussianKernel {
    /// Build a `size x size` kernel; `size` must be odd
    pub fn new(size: usize, sigma: f32) -> Result<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(TerrainError::InvalidKernelSize(size));
        }
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(TerrainError::InvalidParameter {
                name: "sigma",
                value: sigma as f64,
            });
        }

        // 1 / (2 pi sigma^2) cancels under normalization. Stays in f64 until the final
        // cast; the centre weight is exactly 1 so the sum is never zero.
        let radius = (size / 2) as i64;
        let two_sigma_sq = 2.0 * sigma as f64 * sigma as f64;
        let raw: Vec<f64> = (-radius..=radius)
            .flat_map(|i| (-radius..=radius).map(move |j| (i * i + j * j) as f64))
            .map(|d2| (-d2 / two_sigma_sq).exp())
            .collect();
        let sum: f64 = raw.iter().sum();
        let weights = raw.iter().map(|&w| (w / sum) as f32).collect();

        Ok(Self { size, weights })
    }

    pub fn from_radius(radius: usize, sigma: f32) -> Result<Self> {
        Self::new(radius * 2 + 1, sigma)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// Weight at offset `(dx, dy)` from the centre, both in `[-radius, radius]`
    #[inline]
    pub fn weight(&self, dx: isize, dy: isize) -> f32 {
        let r = self.radius() as isize;
        self.weights[((dx + r) as usize) * self.size + (dy + r) as usize]
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Sum of all weights, accumulated in f64
    pub fn sum(&self) -> f32 {
        self.weights.iter().map(|&w| w as f64).sum::<f64>() as f32
    }

    /// Weighted average of the window around `(x, y)`, sampling through `sample`
    #[inline]
    fn convolve<F: Fn(isize, isize) -> f32>(&self, x: isize, y: isize, sample: F) -> f32 {
        let r = self.radius() as isize;
        let mut sum = 0.0f32;
        let mut total_weight = 0.0f32;
        for i in -r..=r {
            for j in -r..=r {
                let weight = self.weight(i, j);
                sum += sample(x + i, y + j) * weight;
                total_weight += weight;
            }
        }
        sum / total_weight
    }
}

/// Smooth a float grid with an edge-clamped Gaussian convolution
pub fn blur_grid(grid: &Grid<f32>, kernel: &GaussianKernel) -> Result<Grid<f32>> {
    log::debug!(
        "blurring {}x{} grid with {}x{} kernel",
        grid.width(),
        grid.height(),
        kernel.size(),
        kernel.size()
    );
    Grid::par_from_fn(grid.width(), grid.height(), |x, y| {
        kernel.convolve(x as isize, y as isize, |sx, sy| grid.clamped(sx, sy))
    })
}

/// Build the kernel from `config` and smooth `grid` with it
pub fn gaussian_blur(grid: &Grid<f32>, config: &BlurConfig) -> Result<Grid<f32>> {
    blur_grid(grid, &config.kernel()?)
}

/// Smooth each RGB channel of an 8-bit image independently
pub fn blur_image(image: &RgbImage, kernel: &GaussianKernel) -> Result<RgbImage> {
    let (width, height) = image.dimensions();
    let (w, h) = (width as usize, height as usize);
    check_dimensions(w, h)?;

    let channel = |c: usize, x: isize, y: isize| {
        let xi = x.clamp(0, w as isize - 1) as u32;
        let yi = y.clamp(0, h as isize - 1) as u32;
        image.get_pixel(xi, yi).0[c] as f32
    };

    let mut result = RgbImage::new(width, height);
    let buffer: &mut [u8] = &mut result;
    buffer
        .par_chunks_mut(w * 3)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.chunks_mut(3).enumerate() {
                for (c, value) in pixel.iter_mut().enumerate() {
                    let v = kernel.convolve(x as isize, y as isize, |sx, sy| channel(c, sx, sy));
                    *value = v.clamp(0.0, 255.0) as u8;
                }
            }
        });

    Ok(result)
}
