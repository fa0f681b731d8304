//! Planet surface generation pipeline
//!
//! Orders the registered generators, samples every property's noise over the
//! torus, fills the tiles, wires neighbours and then runs the features.
//! A world is only published when every stage succeeds.

use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::config::GeneratorConfig;
use crate::error::GenerationError;
use crate::features::{BodiesOfWater, Biomes, FeatureContext, FeatureGenerator, Rivers};
use crate::fractal::torus_coords;
use crate::properties::{HeatProperty, HeightProperty, MoistureProperty, PropertyGenerator};
use crate::registry::Registry;
use crate::seeds::WorldSeeds;
use crate::tile::attr;
use crate::world::World;

pub struct PlanetGenerator {
    config: GeneratorConfig,
    properties: Registry<dyn PropertyGenerator>,
    features: Registry<dyn FeatureGenerator>,
    world: Option<World>,
    seeds: Option<WorldSeeds>,
}

impl PlanetGenerator {
    /// Empty generator; register properties and features before generating.
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            properties: Registry::new(),
            features: Registry::new(),
            world: None,
            seeds: None,
        }
    }

    /// Generator with height, heat, moisture, rivers, bodies and biomes registered.
    pub fn with_default_generators(config: GeneratorConfig) -> Result<Self, GenerationError> {
        let properties: Vec<Box<dyn PropertyGenerator>> = vec![
            Box::new(HeightProperty::new(config.height.clone())),
            Box::new(HeatProperty::new(config.heat.clone())),
            Box::new(MoistureProperty::new(config.moisture.clone())),
        ];
        let features: Vec<Box<dyn FeatureGenerator>> = vec![
            Box::new(Rivers::new(config.rivers.clone())),
            Box::new(BodiesOfWater::new(config.bodies.clone())),
            Box::new(Biomes::new()),
        ];
        Self::from_generators(config, properties, features)
    }

    /// Generator with the given properties and features registered in order.
    pub fn from_generators(
        config: GeneratorConfig,
        properties: Vec<Box<dyn PropertyGenerator>>,
        features: Vec<Box<dyn FeatureGenerator>>,
    ) -> Result<Self, GenerationError> {
        let mut generator = Self::new(config);
        for property in properties {
            generator.register_property(property)?;
        }
        for feature in features {
            generator.register_feature(feature)?;
        }
        Ok(generator)
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn register_property(
        &mut self,
        property: Box<dyn PropertyGenerator>,
    ) -> Result<(), GenerationError> {
        Ok(self.properties.register(property)?)
    }

    pub fn register_feature(
        &mut self,
        feature: Box<dyn FeatureGenerator>,
    ) -> Result<(), GenerationError> {
        Ok(self.features.register(feature)?)
    }

    /// Remove a property or feature by name.
    pub fn unregister(&mut self, name: &str) -> Result<(), GenerationError> {
        if self.properties.remove(name).is_some() || self.features.remove(name).is_some() {
            Ok(())
        } else {
            Err(GenerationError::UnknownGenerator(name.to_string()))
        }
    }

    pub fn property_names(&self) -> Vec<String> {
        self.properties.names()
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.features.names()
    }

    /// The last successfully generated world.
    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    /// Seeds of the last successful run.
    pub fn seeds(&self) -> Option<WorldSeeds> {
        self.seeds
    }

    pub fn property<T: 'static>(&self, name: &str) -> Option<&T> {
        self.properties.get(name)?.as_any().downcast_ref::<T>()
    }

    pub fn feature<T: 'static>(&self, name: &str) -> Option<&T> {
        self.features.get(name)?.as_any().downcast_ref::<T>()
    }

    /// Generate a world from a master seed.
    pub fn generate(&mut self, seed: u64, width: usize, height: usize) -> Result<(), GenerationError> {
        self.generate_with_seeds(WorldSeeds::from_master(seed), width, height)
    }

    /// `generate` reduced to success or failure.
    pub fn generate_ok(&mut self, seed: u64, width: usize, height: usize) -> bool {
        self.generate(seed, width, height).is_ok()
    }

    /// Generate a world with explicit per-system seeds.
    pub fn generate_with_seeds(
        &mut self,
        seeds: WorldSeeds,
        width: usize,
        height: usize,
    ) -> Result<(), GenerationError> {
        self.world = None;
        self.seeds = None;

        let world = self.run(seeds, width, height)?;
        self.world = Some(world);
        self.seeds = Some(seeds);
        Ok(())
    }

    fn run(&mut self, seeds: WorldSeeds, width: usize, height: usize) -> Result<World, GenerationError> {
        if width == 0 || height == 0 || width > i32::MAX as usize || height > i32::MAX as usize {
            return Err(GenerationError::InvalidDimensions { width, height });
        }
        info!("Generating {}x{} surface with seeds {}", width, height, seeds);

        self.properties.sort_by_dependencies()?;
        self.features.sort_by_dependencies()?;
        info!("Property order: {}", self.properties.names().join(" -> "));
        info!("Feature order: {}", self.features.names().join(" -> "));

        let registered = self.properties.names();
        for property in self.properties.iter_mut() {
            if !property.initialise(&registered) {
                return Err(GenerationError::PropertyInitialise(property.name().to_string()));
            }
        }

        for property in self.properties.iter_mut() {
            let seed = seeds.for_property(property.name());
            debug!("Noise for '{}' seeded with {}", property.name(), seed);
            property.generate_noise(seed);
            property.preallocate_map_data(width, height);
        }

        self.sample_properties(width, height);

        let mut world = World::new(width, height);
        for tile in world.tiles_mut() {
            for property in self.properties.iter_mut() {
                property.generate_tile(tile);
            }
        }
        world.wire_neighbors();
        world.update_bitmasks(
            attr::HEIGHT,
            |tile| tile.is_passable(),
            |a, b| a.height().map(|h| h.band) == b.height().map(|h| h.band),
        );
        info!("Filled {} tiles", width * height);

        let mut rng = ChaCha8Rng::seed_from_u64(seeds.rivers);
        for feature in self.features.iter_mut() {
            info!("Running feature '{}'", feature.name());
            let mut ctx = FeatureContext {
                world: &mut world,
                properties: &mut self.properties,
                rng: &mut rng,
            };
            if !feature.generate(&mut ctx) {
                return Err(GenerationError::FeatureNotGenerated(feature.name().to_string()));
            }
        }

        Ok(world)
    }

    /// Sample every property at every grid position, in parallel per property.
    /// Values are recorded in grid order, so min/max never depend on thread timing.
    fn sample_properties(&mut self, width: usize, height: usize) {
        let coords: Vec<[f64; 4]> = (0..height)
            .flat_map(|y| (0..width).map(move |x| torus_coords(x, y, width, height)))
            .collect();

        for property in self.properties.iter_mut() {
            let samples: Vec<f64> = {
                let sampler: &dyn PropertyGenerator = &*property;
                coords.par_iter().map(|&c| sampler.sample_noise(c)).collect()
            };

            let name = property.name().to_string();
            if let Some(map) = property.map_data_mut() {
                for (i, value) in samples.into_iter().enumerate() {
                    map.record(i % width, i / width, value);
                }
                debug!("'{}' samples range [{:.4}, {:.4}]", name, map.min, map.max);
            }
        }
    }
}
