//! Raw per-property sample buffer with running min/max.

use crate::tilemap::Tilemap;

#[derive(Clone, Debug)]
pub struct MapData {
    values: Tilemap<f64>,
    pub min: f64,
    pub max: f64,
}

impl MapData {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            values: Tilemap::new(width, height),
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn width(&self) -> usize {
        self.values.width
    }

    pub fn height(&self) -> usize {
        self.values.height
    }

    /// Store a sample and fold it into the running range. Non-finite samples
    /// are stored but do not move the range.
    pub fn record(&mut self, x: usize, y: usize, value: f64) {
        self.values.set(x, y, value);
        if value.is_finite() {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
    }

    /// Overwrite a raw value without touching min/max.
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        self.values.set(x, y, value);
    }

    pub fn add(&mut self, x: usize, y: usize, amount: f64) {
        *self.values.get_mut(x, y) += amount;
    }

    pub fn value(&self, x: usize, y: usize) -> f64 {
        *self.values.get(x, y)
    }

    /// True when min/max describe a usable range.
    pub fn is_degenerate(&self) -> bool {
        !(self.min.is_finite() && self.max.is_finite() && self.max > self.min)
    }

    /// Map a raw value into the recorded range. Degenerate ranges and
    /// non-finite values normalise to 0.0.
    pub fn normalize(&self, value: f64) -> f64 {
        if self.is_degenerate() || !value.is_finite() {
            return 0.0;
        }
        (value - self.min) / (self.max - self.min)
    }

    pub fn normalized(&self, x: usize, y: usize) -> f64 {
        self.normalize(self.value(x, y))
    }
}
