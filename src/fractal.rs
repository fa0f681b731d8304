//! Seamless fractal noise on a torus.
//!
//! Each grid coordinate is mapped onto two circles in 4D, so sampling wraps on
//! both axes without seams.

use std::f64::consts::PI;

use noise::{NoiseFn, Perlin, Seedable};
use serde::{Deserialize, Serialize};

/// Octave settings for one fractal field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Number of Perlin layers
    pub octaves: u32,
    /// Frequency of the first layer
    pub frequency: f64,
    /// Amplitude multiplier per octave
    pub persistence: f64,
    /// Frequency multiplier per octave
    pub lacunarity: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 6,
            frequency: 1.25,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

impl NoiseConfig {
    pub fn with_octaves(octaves: u32, frequency: f64) -> Self {
        Self {
            octaves,
            frequency,
            ..Default::default()
        }
    }
}

/// 4D sample position for grid cell (x, y) on a width x height torus.
pub fn torus_coords(x: usize, y: usize, width: usize, height: usize) -> [f64; 4] {
    let s = x as f64 / width as f64;
    let t = y as f64 / height as f64;

    let nx = (2.0 * PI * s).cos() / PI;
    let ny = (2.0 * PI * t).cos() / PI;
    let nz = (2.0 * PI * s).sin() / PI;
    let nw = (2.0 * PI * t).sin() / PI;

    [nx, ny, nz, nw]
}

/// Latitude gradient from the `ny` torus component: 0.0 on row 0, 1.0 on the
/// middle row.
pub fn latitude_gradient(coords: &[f64; 4]) -> f64 {
    (0.5 - coords[1] * PI / 2.0).clamp(0.0, 1.0)
}

/// Multi-octave Perlin fractal, normalised by total amplitude.
#[derive(Clone, Debug)]
pub struct Fractal {
    perlin: Perlin,
    config: NoiseConfig,
}

impl Fractal {
    pub fn new(seed: u64, config: &NoiseConfig) -> Self {
        Self {
            perlin: Perlin::new(1).set_seed(seed as u32),
            config: config.clone(),
        }
    }

    /// Roughly in [-1, 1].
    pub fn sample(&self, coords: [f64; 4]) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.config.frequency;
        let mut max_value = 0.0;

        for _ in 0..self.config.octaves {
            let p = coords.map(|c| c * frequency);
            total += amplitude * self.perlin.get(p);
            max_value += amplitude;
            amplitude *= self.config.persistence;
            frequency *= self.config.lacunarity;
        }

        if max_value == 0.0 {
            return 0.0;
        }
        total / max_value
    }

    /// Sample remapped to [0, 1].
    pub fn sample_unit(&self, coords: [f64; 4]) -> f64 {
        ((self.sample(coords) + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}
