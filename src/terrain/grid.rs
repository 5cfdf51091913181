//! Dense 2D grid stored as a flat row-major buffer.
//!
//! Lattices, elevation grids and blur inputs all share this type so the
//! interpolation and convolution code is written once.

use rayon::prelude::*;
use serde::Serialize;

use crate::error::{Result, TerrainError};

/// Fail fast on empty dimensions before anything gets allocated
pub fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(TerrainError::InvalidDimension { width, height });
    }
    Ok(())
}

/// Grid dimensions as `image` buffer dimensions, which are `u32`
pub fn image_dimensions(width: usize, height: usize) -> Result<(u32, u32)> {
    check_dimensions(width, height)?;
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(TerrainError::InvalidDimension { width, height }),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Grid with every cell set to `value`
    pub fn filled(width: usize, height: usize, value: T) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![value; width * height],
        })
    }
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::filled(width, height, T::default())
    }
}

impl<T: Clone + Default + Send> Grid<T> {
    /// Build a grid by evaluating `f(x, y)` for every cell, one rayon task per row
    pub fn par_from_fn<F>(width: usize, height: usize, f: F) -> Result<Self>
    where
        F: Fn(usize, usize) -> T + Sync,
    {
        let mut grid = Self::new(width, height)?;
        grid.data
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, cell) in row.iter_mut().enumerate() {
                    *cell = f(x, y);
                }
            });
        Ok(grid)
    }
}

impl<T> Grid<T> {
    /// Wrap an existing row-major buffer
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self> {
        check_dimensions(width, height)?;
        if data.len() != width * height {
            return Err(TerrainError::LatticeSize {
                expected: width * height,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let i = self.idx(x, y);
        self.data[i] = value;
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Rows from `y = 0` upwards
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks(self.width)
    }

    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl<T: Copy> Grid<T> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.idx(x, y)]
    }

    /// Sample with edge clamping: out-of-range coordinates reuse the nearest border cell
    #[inline]
    pub fn clamped(&self, x: isize, y: isize) -> T {
        let xi = x.clamp(0, self.width as isize - 1) as usize;
        let yi = y.clamp(0, self.height as isize - 1) as usize;
        self.get(xi, yi)
    }

    /// Sample with toroidal wrap: coordinates are taken modulo width/height
    #[inline]
    pub fn wrapped(&self, x: i64, y: i64) -> T {
        let xi = x.rem_euclid(self.width as i64) as usize;
        let yi = y.rem_euclid(self.height as i64) as usize;
        self.get(xi, yi)
    }
}

impl Grid<f32> {
    /// Smallest and largest cell value
    pub fn min_max(&self) -> (f32, f32) {
        self.data.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
    }

    pub fn mean(&self) -> f32 {
        let sum: f64 = self.data.iter().map(|&v| v as f64).sum();
        (sum / self.data.len() as f64) as f32
    }
}
