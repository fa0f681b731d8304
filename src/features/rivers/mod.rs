//! River feature
//!
//! Seeds rivers on high ground, routes each one downhill to open water,
//! discards those that fail validation, groups the survivors into trees,
//! carves their channels and finally wets the land around them.

pub mod carving;
pub mod river;
pub mod routing;
pub mod tree;

use std::any::Any;

use log::{debug, info, warn};
use rand::Rng;

use super::{FeatureContext, FeatureGenerator};
use crate::config::RiverConfig;
use crate::properties::MoistureProperty;
use crate::sorter::Named;
use crate::tile::{attr, TileIndex};
use crate::tilemap::Tilemap;
use crate::world::World;

use carving::Carver;
pub use river::{River, RiverOccupancy};
use routing::{find_path_to_standing_water, is_valid, lowest_neighbor, source_candidates};
pub use tree::RiverTree;

/// Counters from the last run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RiverStats {
    pub attempts: usize,
    pub committed: usize,
    pub discarded: usize,
    pub trees: usize,
    pub carved_tiles: usize,
}

pub struct Rivers {
    config: RiverConfig,
    rivers: Vec<River>,
    trees: Vec<RiverTree>,
    stats: RiverStats,
}

impl Rivers {
    pub fn new(config: RiverConfig) -> Self {
        Self {
            config,
            rivers: Vec::new(),
            trees: Vec::new(),
            stats: RiverStats::default(),
        }
    }

    /// Committed rivers, source first.
    pub fn rivers(&self) -> &[River] {
        &self.rivers
    }

    pub fn trees(&self) -> &[RiverTree] {
        &self.trees
    }

    pub fn stats(&self) -> &RiverStats {
        &self.stats
    }

    /// Seed and route rivers until the target count or the attempt budget is reached.
    fn generate_rivers(&mut self, world: &World, rng: &mut impl Rng) -> RiverOccupancy {
        let mut occupancy = RiverOccupancy::new(world.width(), world.height());
        let mut candidates = source_candidates(world, self.config.min_river_height);
        debug!("{} river source candidates", candidates.len());

        while self.rivers.len() < self.config.river_count
            && self.stats.attempts < self.config.max_river_attempts
        {
            if candidates.is_empty() {
                debug!("No free river sources left");
                break;
            }

            let source = candidates[rng.gen_range(0..candidates.len())];
            if !occupancy.is_free(source) {
                candidates.retain(|&c| occupancy.is_free(c));
                continue;
            }

            self.stats.attempts += 1;
            let mut river = River::new(self.rivers.len());
            let heading = lowest_neighbor(world, source);
            find_path_to_standing_water(world, &mut occupancy, &mut river, source, heading);

            if is_valid(&river, &self.config) {
                self.rivers.push(river);
            } else {
                occupancy.remove(&river.tiles, river.id);
                self.stats.discarded += 1;
            }
        }

        self.stats.committed = self.rivers.len();
        occupancy
    }

    /// Inverse-distance moisture boost around every river tile.
    fn adjust_moisture(&self, world: &mut World, moisture: &mut MoistureProperty) {
        let reach = self.config.moisture_radius as i64;
        let mut boost: Vec<(i64, i64, f64)> = Vec::new();
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let distance = ((dx * dx + dy * dy) as f64).sqrt();
                if distance > 0.0 && distance <= reach as f64 {
                    boost.push((dx, dy, self.config.moisture_strength / distance));
                }
            }
        }

        let mut delta: Tilemap<f64> = Tilemap::new(world.width(), world.height());
        for t in river_tiles(&self.rivers) {
            for &(dx, dy, amount) in &boost {
                *delta.get_wrapped_mut(t.x as i64 + dx, t.y as i64 + dy) += amount;
            }
        }

        for (x, y, &amount) in delta.iter() {
            if amount > 0.0 {
                let tile = world.tile_mut(x as i32, y as i32);
                moisture.add_moisture_to_tile(tile, amount);
            }
        }
    }
}

impl Named for Rivers {
    fn name(&self) -> &str {
        attr::RIVERS
    }
}

impl FeatureGenerator for Rivers {
    fn generate(&mut self, ctx: &mut FeatureContext<'_>) -> bool {
        if let Err(e) = self.config.validate() {
            warn!("Rivers not generated: {}", e);
            return false;
        }
        let moisture_ready = ctx
            .properties
            .get(attr::MOISTURE)
            .map_or(false, |p| p.as_any().is::<MoistureProperty>());
        if !ctx.has_property(attr::HEIGHT) || !moisture_ready {
            warn!("Rivers need the height and moisture properties");
            return false;
        }

        self.rivers.clear();
        self.trees.clear();
        self.stats = RiverStats::default();

        let occupancy = self.generate_rivers(ctx.world, &mut *ctx.rng);
        info!(
            "Rivers: {} committed, {} discarded after {} attempts",
            self.stats.committed, self.stats.discarded, self.stats.attempts
        );

        self.trees = tree::build_trees(&self.rivers, &occupancy);
        self.stats.trees = self.trees.len();

        {
            let mut carver = Carver::new(ctx.world, ctx.rng, &self.config);
            for (tree_id, tree) in self.trees.iter().enumerate() {
                carver.dig_tree(&mut self.rivers, tree, tree_id, 0, self.config.max_river_width);
            }
        }
        self.stats.carved_tiles = ctx.world.tiles().filter(|t| t.river().is_some()).count();
        info!(
            "Carved {} river trees over {} tiles",
            self.stats.trees, self.stats.carved_tiles
        );

        let world = &mut *ctx.world;
        if let Some(moisture) = ctx
            .properties
            .get_mut(attr::MOISTURE)
            .and_then(|p| p.as_any_mut().downcast_mut::<MoistureProperty>())
        {
            self.adjust_moisture(world, moisture);
        }

        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Tile indices of every committed river, deduplicated and in grid order.
pub fn river_tiles(rivers: &[River]) -> Vec<TileIndex> {
    let mut tiles: Vec<TileIndex> = rivers.iter().flat_map(|r| r.tiles.iter().copied()).collect();
    tiles.sort_by_key(|t| (t.y, t.x));
    tiles.dedup();
    tiles
}
