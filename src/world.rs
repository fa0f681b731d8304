//! World tile arena
//!
//! Owns the width x height grid of tiles on a torus. All coordinate lookups
//! sanitise their input, so any signed offset lands on a real tile.

use serde::Serialize;

use crate::features::biomes::Biome;
use crate::properties::heat::HeatBand;
use crate::properties::height::HeightBand;
use crate::properties::moisture::MoistureBand;
use crate::tile::{BodyOfData, Direction, RiverData, Tile, TileIndex};
use crate::tilemap::Tilemap;

/// Grid axis, for coordinate arithmetic on one dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

pub struct World {
    tiles: Tilemap<Tile>,
}

impl World {
    /// Create a grid of empty tiles. Neighbours are not wired yet.
    pub fn new(width: usize, height: usize) -> Self {
        let tiles = Tilemap::from_fn(width, height, |x, y| {
            Tile::new(TileIndex::new(x as i32, y as i32))
        });
        Self { tiles }
    }

    pub fn width(&self) -> usize {
        self.tiles.width
    }

    pub fn height(&self) -> usize {
        self.tiles.height
    }

    /// Fold any coordinate pair onto the grid.
    pub fn sanitize(&self, x: i32, y: i32) -> TileIndex {
        TileIndex::new(
            self.tiles.wrap_x(x as i64) as i32,
            self.tiles.wrap_y(y as i64) as i32,
        )
    }

    /// `base + delta` on one axis, wrapped onto the grid.
    pub fn relative_sanitized_coordinate(&self, axis: Axis, base: i32, delta: i32) -> i32 {
        let value = base as i64 + delta as i64;
        match axis {
            Axis::X => self.tiles.wrap_x(value) as i32,
            Axis::Y => self.tiles.wrap_y(value) as i32,
        }
    }

    pub fn tile(&self, x: i32, y: i32) -> &Tile {
        self.tiles.get_wrapped(x as i64, y as i64)
    }

    pub fn tile_mut(&mut self, x: i32, y: i32) -> &mut Tile {
        self.tiles.get_wrapped_mut(x as i64, y as i64)
    }

    pub fn tile_by_index(&self, index: TileIndex) -> &Tile {
        self.tile(index.x, index.y)
    }

    pub fn tile_by_index_mut(&mut self, index: TileIndex) -> &mut Tile {
        self.tile_mut(index.x, index.y)
    }

    /// Store a tile at the position given by its own index.
    pub fn set_tile(&mut self, tile: Tile) {
        let index = tile.index();
        *self.tile_by_index_mut(index) = tile;
    }

    /// Index of the tile one step from `index` in `direction`.
    pub fn index_in_direction(&self, index: TileIndex, direction: Direction) -> TileIndex {
        let (dx, dy) = direction.offset();
        self.sanitize(index.x + dx, index.y + dy)
    }

    /// Neighbouring tile, using the wired links when present.
    pub fn neighbor(&self, index: TileIndex, direction: Direction) -> &Tile {
        let tile = self.tile_by_index(index);
        let next = tile
            .neighbor(direction)
            .unwrap_or_else(|| self.index_in_direction(index, direction));
        self.tile_by_index(next)
    }

    /// Link every tile to its four neighbours.
    pub fn wire_neighbors(&mut self) {
        let (w, h) = (self.width(), self.height());
        for y in 0..h {
            for x in 0..w {
                let index = TileIndex::new(x as i32, y as i32);
                let links = Direction::ALL.map(|d| self.index_in_direction(index, d));
                self.tiles.get_mut(x, y).set_neighbors(links);
            }
        }
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().map(|(_, _, t)| t)
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut().map(|(_, _, t)| t)
    }

    /// Compute a 4-bit adjacency mask under `name` for every tile passing `include`.
    /// A bit is set when the neighbour in that direction satisfies `same`.
    pub fn update_bitmasks(
        &mut self,
        name: &str,
        include: impl Fn(&Tile) -> bool,
        same: impl Fn(&Tile, &Tile) -> bool,
    ) {
        let masks: Vec<Option<u8>> = self
            .tiles()
            .map(|tile| {
                if !include(tile) {
                    return None;
                }
                let mask = Direction::ALL.iter().fold(0u8, |acc, &dir| {
                    if same(tile, self.neighbor(tile.index(), dir)) {
                        acc | dir.bit()
                    } else {
                        acc
                    }
                });
                Some(mask)
            })
            .collect();

        for (tile, mask) in self.tiles_mut().zip(masks) {
            if let Some(mask) = mask {
                tile.set_bitmask(name, mask);
            }
        }
    }

    /// Flat summary of one tile.
    pub fn tile_info(&self, x: i32, y: i32) -> TileInfo {
        let tile = self.tile(x, y);
        let index = tile.index();
        let height = tile.height();
        let heat = tile.heat();
        let moisture = tile.moisture();

        TileInfo {
            x: index.x,
            y: index.y,
            height: height.map(|h| h.value),
            height_band: height.map(|h| h.band),
            passable: tile.is_passable(),
            heat: heat.map(|h| h.value),
            heat_band: heat.map(|h| h.band),
            moisture: moisture.map(|m| m.value),
            moisture_band: moisture.map(|m| m.band),
            biome: tile.biome(),
            body: tile.body().copied(),
            river: tile.river().copied(),
        }
    }
}

/// Information about a single tile
#[derive(Clone, Debug, Serialize)]
pub struct TileInfo {
    pub x: i32,
    pub y: i32,
    pub height: Option<f64>,
    pub height_band: Option<HeightBand>,
    pub passable: bool,
    pub heat: Option<f64>,
    pub heat_band: Option<HeatBand>,
    pub moisture: Option<f64>,
    pub moisture_band: Option<MoistureBand>,
    pub biome: Option<Biome>,
    pub body: Option<BodyOfData>,
    pub river: Option<RiverData>,
}

impl TileInfo {
    /// Format height as string
    pub fn height_str(&self) -> String {
        match (self.height, self.height_band) {
            (Some(h), Some(band)) => format!("{:.3} ({})", h, band.display_name()),
            _ => "-".to_string(),
        }
    }

    /// Format body of water/land as string
    pub fn body_str(&self) -> String {
        match self.body {
            Some(body) => format!("{} #{}", body.kind.display_name(), body.id),
            None => "-".to_string(),
        }
    }

    pub fn river_str(&self) -> String {
        match self.river {
            Some(r) => format!(
                "river {} (tree {}), water {:.3}, floor {:.3}",
                r.river, r.tree, r.water_level, r.floor
            ),
            None => "none".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_lookup_wraps_both_axes() {
        let world = World::new(8, 6);
        let (w, h) = (world.width() as i32, world.height() as i32);

        assert_eq!(world.tile(-1, 0).index(), world.tile(w - 1, 0).index());
        assert_eq!(world.tile(w, 0).index(), world.tile(0, 0).index());
        assert_eq!(world.tile(0, -1).index(), world.tile(0, h - 1).index());
        assert_eq!(world.tile(0, h).index(), world.tile(0, 0).index());
    }

    #[test]
    fn test_neighbor_links_are_symmetric() {
        let mut world = World::new(5, 4);
        world.wire_neighbors();

        for tile in world.tiles() {
            for dir in Direction::ALL {
                let next = tile.neighbor(dir).unwrap();
                let back = world.tile_by_index(next).neighbor(dir.opposite()).unwrap();
                assert_eq!(back, tile.index(), "{:?} from {}", dir, tile.index());
            }
        }
    }

    #[test]
    fn test_index_in_direction_wraps() {
        let world = World::new(4, 4);
        let corner = TileIndex::new(0, 0);
        assert_eq!(world.index_in_direction(corner, Direction::Left), TileIndex::new(3, 0));
        assert_eq!(world.index_in_direction(corner, Direction::Above), TileIndex::new(0, 3));
        assert_eq!(
            world.index_in_direction(TileIndex::new(3, 3), Direction::Below),
            TileIndex::new(3, 0)
        );
    }

    #[test]
    fn test_relative_sanitized_coordinate() {
        let world = World::new(10, 7);
        assert_eq!(world.relative_sanitized_coordinate(Axis::X, 2, -5), 7);
        assert_eq!(world.relative_sanitized_coordinate(Axis::Y, 6, 1), 0);
        assert_eq!(world.relative_sanitized_coordinate(Axis::Y, 3, -24), 0);
    }

    #[test]
    fn test_set_tile_uses_its_index() {
        let mut world = World::new(3, 3);
        let mut tile = Tile::new(TileIndex::new(1, 2));
        tile.set_bitmask("marker", 5);
        world.set_tile(tile);
        assert_eq!(world.tile(1, 2).bitmask("marker"), Some(5));
        assert_eq!(world.tile(1, -1).bitmask("marker"), Some(5));
    }

    #[test]
    fn test_bitmask_of_uniform_grid_is_full() {
        let mut world = World::new(3, 3);
        world.wire_neighbors();
        world.update_bitmasks("all", |_| true, |_, _| true);
        assert!(world.tiles().all(|t| t.bitmask("all") == Some(0b1111)));
    }
}
