//! Seeded value noise with fractal octave summation and bicubic lattice interpolation.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::grid::{check_dimensions, Grid};
use crate::error::{Result, TerrainError};

/// Configuration for procedural noise generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Random seed for reproducible generation
    pub seed: u64,

    /// Lattice cells advanced per output cell in the first octave
    /// Typical range: 0.01 - 0.2
    pub frequency: f32,

    /// Weight of the first octave
    /// Typical range: (0, 1]
    pub amplitude: f32,

    /// How much each octave contributes (amplitude decay)
    /// Typical range: 0.3 - 0.7
    pub persistence: f32,

    /// Number of noise layers to combine (more = more detail)
    /// Typical range: 1 - 8
    pub octaves: u32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            frequency: 0.05,
            amplitude: 1.0,
            persistence: 0.5,
            octaves: 4,
        }
    }
}

impl NoiseConfig {
    /// Create a new noise configuration with custom parameters
    pub fn new(seed: u64, frequency: f32, amplitude: f32, persistence: f32, octaves: u32) -> Self {
        Self {
            seed,
            frequency,
            amplitude,
            persistence,
            octaves,
        }
    }

    /// Create configuration for smooth, large-scale features
    pub fn smooth(seed: u64) -> Self {
        Self {
            seed,
            frequency: 0.02,
            amplitude: 1.0,
            persistence: 0.6,
            octaves: 3,
        }
    }

    /// Create configuration for rough, detailed features
    pub fn rough(seed: u64) -> Self {
        Self {
            seed,
            frequency: 0.1,
            amplitude: 1.0,
            persistence: 0.4,
            octaves: 8,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(TerrainError::InvalidParameter {
                name: "frequency",
                value: self.frequency as f64,
            });
        }
        if !self.amplitude.is_finite() {
            return Err(TerrainError::InvalidParameter {
                name: "amplitude",
                value: self.amplitude as f64,
            });
        }
        if !self.persistence.is_finite() {
            return Err(TerrainError::InvalidParameter {
                name: "persistence",
                value: self.persistence as f64,
            });
        }
        if self.octaves == 0 {
            return Err(TerrainError::InvalidParameter {
                name: "octaves",
                value: 0.0,
            });
        }
        Ok(())
    }
}

/// Four-point cubic through `b` (t = 0) and `c` (t = 1)
#[inline]
pub fn cubic_interpolate(a: f32, b: f32, c: f32, d: f32, t: f32) -> f32 {
    let p = (d - c) - (a - b);
    p * t * t * t + ((a - b) - p) * t * t + (c - a) * t + b
}

/// Base random lattice, one uniform value in `[-1, 1]` per cell
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseLattice {
    values: Grid<f32>,
}

impl NoiseLattice {
    /// Fill a `width x height` lattice from a generator seeded by `seed`.
    ///
    /// Draws happen one per cell with `x` in the outer loop and `y` in the
    /// inner loop, so the same seed and dimensions always give the same lattice.
    pub fn generate(seed: u64, width: usize, height: usize) -> Result<Self> {
        check_dimensions(width, height)?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut values = Grid::new(width, height)?;
        for x in 0..width {
            for y in 0..height {
                let sample: f32 = rng.random();
                values.set(x, y, sample * 2.0 - 1.0);
            }
        }

        log::debug!("generated {}x{} noise lattice (seed {})", width, height, seed);
        Ok(Self { values })
    }

    /// Lattice from known row-major values
    pub fn from_values(width: usize, height: usize, values: Vec<f32>) -> Result<Self> {
        Ok(Self {
            values: Grid::from_vec(width, height, values)?,
        })
    }

    pub fn width(&self) -> usize {
        self.values.width()
    }

    pub fn height(&self) -> usize {
        self.values.height()
    }

    pub fn values(&self) -> &Grid<f32> {
        &self.values
    }

    /// Bicubic sample at fractional lattice coordinates, wrapping on both axes.
    ///
    /// Coordinates must be finite; they may be arbitrarily large.
    pub fn interpolate(&self, x: f32, y: f32) -> f32 {
        let fx = x.floor();
        let fy = y.floor();
        let frac_x = x - fx;
        let frac_y = y - fy;
        // Wrap in f64 before the integer cast so huge coordinates cannot saturate
        let x0 = (fx as f64).rem_euclid(self.width() as f64) as i64;
        let y0 = (fy as f64).rem_euclid(self.height() as f64) as i64;

        // Collapse each column of the 4x4 neighbourhood along y, then blend the columns along x
        let mut columns = [0.0f32; 4];
        for (i, column) in columns.iter_mut().enumerate() {
            let xi = x0 + i as i64 - 1;
            *column = cubic_interpolate(
                self.values.wrapped(xi, y0 - 1),
                self.values.wrapped(xi, y0),
                self.values.wrapped(xi, y0 + 1),
                self.values.wrapped(xi, y0 + 2),
                frac_y,
            );
        }

        cubic_interpolate(columns[0], columns[1], columns[2], columns[3], frac_x)
    }

    /// Fractal (fBm) value at output cell `(x, y)`, clamped to `[-1, 1]`.
    ///
    /// Summation stops early once the amplitude has decayed to zero, or once
    /// sample coordinates or the running sum leave the finite `f32` range.
    pub fn value_at(&self, x: usize, y: usize, config: &NoiseConfig) -> f32 {
        let mut frequency = config.frequency;
        let mut amplitude = config.amplitude;
        let mut value = 0.0f32;

        for _ in 0..config.octaves {
            let sx = x as f32 * frequency;
            let sy = y as f32 * frequency;
            if amplitude == 0.0 || !(amplitude.is_finite() && sx.is_finite() && sy.is_finite()) {
                break;
            }
            value += self.interpolate(sx, sy) * amplitude;
            if !value.is_finite() {
                break;
            }
            frequency *= 2.0;
            amplitude *= config.persistence;
        }

        value.clamp(-1.0, 1.0)
    }
}

/// Lattice paired with the octave parameters used to sample it
pub struct NoiseGenerator {
    config: NoiseConfig,
    lattice: NoiseLattice,
}

impl NoiseGenerator {
    /// Create a new noise generator whose lattice matches the output dimensions
    pub fn new(config: NoiseConfig, width: usize, height: usize) -> Result<Self> {
        config.validate()?;
        let lattice = NoiseLattice::generate(config.seed, width, height)?;
        Ok(Self { config, lattice })
    }

    /// Use an existing lattice instead of drawing one from the seed
    pub fn with_lattice(config: NoiseConfig, lattice: NoiseLattice) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, lattice })
    }

    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    pub fn lattice(&self) -> &NoiseLattice {
        &self.lattice
    }

    /// Generate noise value at given cell, range `[-1, 1]`
    pub fn generate(&self, x: usize, y: usize) -> f32 {
        self.lattice.value_at(x, y, &self.config)
    }

    /// Evaluate every cell of the lattice-sized grid, rows in parallel
    pub fn generate_grid(&self) -> Result<Grid<f32>> {
        self.generate_grid_with(|v| v)
    }

    /// Same as [`Self::generate_grid`] but maps each value through `f`
    pub fn generate_grid_with<F>(&self, f: F) -> Result<Grid<f32>>
    where
        F: Fn(f32) -> f32 + Sync,
    {
        Grid::par_from_fn(self.lattice.width(), self.lattice.height(), |x, y| {
            f(self.generate(x, y))
        })
    }
}
