//! Per-tile scalar fields derived from noise
//!
//! A property samples a fractal into its own `MapData`, then fills one bucket
//! on every tile from the normalised sample. Tile fill may read buckets of
//! properties that ran earlier on the same tile, never neighbouring tiles.

pub mod heat;
pub mod height;
pub mod moisture;

use std::any::Any;

use crate::map_data::MapData;
use crate::sorter::Named;
use crate::tile::Tile;

pub use heat::HeatProperty;
pub use height::HeightProperty;
pub use moisture::MoistureProperty;

pub trait PropertyGenerator: Named + Send + Sync {
    /// Check tables and required properties before anything runs.
    /// `registered` holds the names of every registered property.
    fn initialise(&mut self, registered: &[String]) -> bool;

    /// Build the noise field for this run.
    fn generate_noise(&mut self, seed: u64);

    /// Allocate an empty sample buffer for a width x height grid.
    fn preallocate_map_data(&mut self, width: usize, height: usize);

    /// Raw sample at one torus position. Must not depend on sampling order.
    fn sample_noise(&self, coords: [f64; 4]) -> f64;

    fn map_data(&self) -> Option<&MapData>;

    fn map_data_mut(&mut self) -> Option<&mut MapData>;

    /// Attach this property's bucket to `tile`.
    fn generate_tile(&mut self, tile: &mut Tile);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// True when `name` is among `registered`, ignoring case.
pub(crate) fn is_registered(registered: &[String], name: &str) -> bool {
    registered.iter().any(|r| r.eq_ignore_ascii_case(name))
}

/// Grid coordinates of a tile.
pub(crate) fn grid_position(tile: &Tile) -> (usize, usize) {
    let index = tile.index();
    (index.x as usize, index.y as usize)
}
