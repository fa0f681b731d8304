//! Bodies of land and water
//!
//! Splits the grid into connected regions of equal passability. Land regions
//! start out as continents and water regions as oceans; regions smaller than
//! the configured thresholds become islands and lakes.

use std::any::Any;

use log::{info, warn};
use serde::Serialize;

use super::{FeatureContext, FeatureGenerator};
use crate::config::BodiesConfig;
use crate::sorter::Named;
use crate::tile::{attr, BodyOfData, DataBucket, TileIndex};
use crate::tilemap::Tilemap;
use crate::world::World;

/// Type of a connected region
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum BodyKind {
    Continent,
    Island,
    Lake,
    Ocean,
}

impl BodyKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            BodyKind::Continent => "Continent",
            BodyKind::Island => "Island",
            BodyKind::Lake => "Lake",
            BodyKind::Ocean => "Ocean",
        }
    }

    pub fn is_land(&self) -> bool {
        matches!(self, BodyKind::Continent | BodyKind::Island)
    }
}

/// One connected region and its member tiles
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BodyOf {
    pub id: usize,
    pub kind: BodyKind,
    pub tiles: Vec<TileIndex>,
    pub min_height: f64,
    pub max_height: f64,
    pub avg_height: f64,
}

impl BodyOf {
    fn new(id: usize, kind: BodyKind) -> Self {
        Self {
            id,
            kind,
            tiles: Vec::new(),
            min_height: f64::MAX,
            max_height: f64::MIN,
            avg_height: 0.0,
        }
    }

    fn add_tile(&mut self, index: TileIndex, height: f64) {
        self.tiles.push(index);
        self.min_height = self.min_height.min(height);
        self.max_height = self.max_height.max(height);

        // Running average
        let n = self.tiles.len() as f64;
        self.avg_height = self.avg_height * (n - 1.0) / n + height / n;
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Counts per body kind
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BodyStats {
    pub continents: usize,
    pub islands: usize,
    pub lakes: usize,
    pub oceans: usize,
}

impl BodyStats {
    pub fn land(&self) -> usize {
        self.continents + self.islands
    }

    pub fn water(&self) -> usize {
        self.lakes + self.oceans
    }
}

pub struct BodiesOfWater {
    config: BodiesConfig,
    bodies: Vec<BodyOf>,
}

impl BodiesOfWater {
    pub fn new(config: BodiesConfig) -> Self {
        Self {
            config,
            bodies: Vec::new(),
        }
    }

    /// Bodies from the last run, ordered by id.
    pub fn bodies(&self) -> &[BodyOf] {
        &self.bodies
    }

    pub fn stats(&self) -> BodyStats {
        let mut stats = BodyStats::default();
        for body in &self.bodies {
            match body.kind {
                BodyKind::Continent => stats.continents += 1,
                BodyKind::Island => stats.islands += 1,
                BodyKind::Lake => stats.lakes += 1,
                BodyKind::Ocean => stats.oceans += 1,
            }
        }
        stats
    }

    fn classify(&self, body: &mut BodyOf) {
        match body.kind {
            BodyKind::Continent if body.len() < self.config.island_threshold => {
                body.kind = BodyKind::Island;
            }
            BodyKind::Ocean if body.len() < self.config.lake_threshold => {
                body.kind = BodyKind::Lake;
            }
            _ => {}
        }
    }
}

/// Group every tile into 4-connected regions of equal passability.
///
/// Uses an explicit stack; tiles are marked when pushed so none is queued twice.
pub fn flood_fill(world: &World) -> Vec<BodyOf> {
    let mut visited = Tilemap::new_with(world.width(), world.height(), false);
    let mut bodies = Vec::new();
    let mut stack: Vec<TileIndex> = Vec::new();

    for tile in world.tiles() {
        let start = tile.index();
        if *visited.get(start.x as usize, start.y as usize) {
            continue;
        }

        let passable = tile.is_passable();
        let kind = if passable {
            BodyKind::Continent
        } else {
            BodyKind::Ocean
        };
        let mut body = BodyOf::new(bodies.len(), kind);

        visited.set(start.x as usize, start.y as usize, true);
        stack.push(start);

        while let Some(index) = stack.pop() {
            let current = world.tile_by_index(index);
            body.add_tile(index, current.height_value());

            for (nx, ny) in visited.neighbors(index.x as usize, index.y as usize) {
                if *visited.get(nx, ny) {
                    continue;
                }
                if world.tile(nx as i32, ny as i32).is_passable() == passable {
                    visited.set(nx, ny, true);
                    stack.push(TileIndex::new(nx as i32, ny as i32));
                }
            }
        }

        bodies.push(body);
    }

    bodies
}

impl Named for BodiesOfWater {
    fn name(&self) -> &str {
        attr::BODIES
    }

    fn dependencies(&self) -> Vec<String> {
        vec![attr::RIVERS.to_string()]
    }
}

impl FeatureGenerator for BodiesOfWater {
    fn generate(&mut self, ctx: &mut FeatureContext<'_>) -> bool {
        if !ctx.has_property(attr::HEIGHT) {
            warn!("Bodies of water need the height property");
            return false;
        }

        let mut bodies = flood_fill(ctx.world);
        for body in &mut bodies {
            self.classify(body);
            let data = DataBucket::BodyOf(BodyOfData {
                id: body.id,
                kind: body.kind,
            });
            for &index in &body.tiles {
                ctx.world
                    .tile_by_index_mut(index)
                    .set_attribute(attr::BODIES, data);
            }
        }
        self.bodies = bodies;

        let stats = self.stats();
        info!(
            "Bodies: {} continents, {} islands, {} oceans, {} lakes",
            stats.continents, stats.islands, stats.oceans, stats.lakes
        );
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
