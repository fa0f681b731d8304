//! Seed management for surface generation
//!
//! Every generator gets its own seed derived from the master seed, so the
//! height field can be held fixed while heat or river placement varies.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Seeds for all surface generation systems.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Height noise field
    pub height: u64,
    /// Heat noise field
    pub heat: u64,
    /// Moisture noise field
    pub moisture: u64,
    /// Random stream shared by every feature (river sites, widths, depth jitter)
    pub rivers: u64,
}

impl WorldSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            height: derive_seed(master, "height"),
            heat: derive_seed(master, "heat"),
            moisture: derive_seed(master, "moisture"),
            rivers: derive_seed(master, "rivers"),
        }
    }

    /// Create a builder for customizing individual seeds
    pub fn builder(master: u64) -> WorldSeedsBuilder {
        WorldSeedsBuilder::new(master)
    }

    /// Noise seed for a property generator by its registered name.
    /// Unknown names get a seed derived from the name itself.
    pub fn for_property(&self, name: &str) -> u64 {
        match name.to_ascii_lowercase().as_str() {
            "height" => self.height,
            "heat" => self.heat,
            "moisture" => self.moisture,
            other => derive_seed(self.master, other),
        }
    }
}

/// Builder for customizing individual seeds while deriving others from master
pub struct WorldSeedsBuilder {
    seeds: WorldSeeds,
}

impl WorldSeedsBuilder {
    pub fn new(master: u64) -> Self {
        Self {
            seeds: WorldSeeds::from_master(master),
        }
    }

    pub fn height(mut self, seed: u64) -> Self {
        self.seeds.height = seed;
        self
    }

    pub fn heat(mut self, seed: u64) -> Self {
        self.seeds.heat = seed;
        self
    }

    pub fn moisture(mut self, seed: u64) -> Self {
        self.seeds.moisture = seed;
        self
    }

    pub fn rivers(mut self, seed: u64) -> Self {
        self.seeds.rivers = seed;
        self
    }

    pub fn build(self) -> WorldSeeds {
        self.seeds
    }
}

/// Derive a sub-seed from a master seed and a system name.
fn derive_seed(master: u64, system: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    system.hash(&mut hasher);
    hasher.finish()
}

impl std::fmt::Display for WorldSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WorldSeeds {{ master: {}, height: {}, heat: {}, moisture: {}, rivers: {} }}",
            self.master, self.height, self.heat, self.moisture, self.rivers,
        )
    }
}
