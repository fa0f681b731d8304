//! Post-processing passes over the filled tile grid
//!
//! Features run one at a time in dependency order. Each sees the whole world
//! and may replace feature buckets on any tile.

pub mod biomes;
pub mod bodies;
pub mod rivers;

use std::any::Any;

use rand_chacha::ChaCha8Rng;

use crate::properties::PropertyGenerator;
use crate::registry::Registry;
use crate::sorter::Named;
use crate::world::World;

pub use biomes::{Biome, Biomes};
pub use bodies::{BodiesOfWater, BodyKind, BodyOf};
pub use rivers::{River, RiverTree, Rivers};

/// Everything a feature may read or change during its run.
pub struct FeatureContext<'a> {
    pub world: &'a mut World,
    pub properties: &'a mut Registry<dyn PropertyGenerator>,
    /// Shared random stream; features draw from it in run order
    pub rng: &'a mut ChaCha8Rng,
}

impl FeatureContext<'_> {
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains(name)
    }
}

pub trait FeatureGenerator: Named + Send {
    /// Run the feature. `false` means its tile attributes are absent.
    fn generate(&mut self, ctx: &mut FeatureContext<'_>) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
