//! Tile data model
//!
//! A tile owns its coordinate, the coordinates of its four neighbours and one
//! `DataBucket` per property or feature that has touched it. Neighbours are
//! stored as indices into the world's tile arena, never as references.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::features::biomes::Biome;
use crate::features::bodies::BodyKind;
use crate::properties::heat::HeatBand;
use crate::properties::height::HeightBand;
use crate::properties::moisture::MoistureBand;

/// Attribute and bitmask keys used by the built-in generators.
pub mod attr {
    pub const HEIGHT: &str = "height";
    pub const HEAT: &str = "heat";
    pub const MOISTURE: &str = "moisture";
    pub const RIVERS: &str = "rivers";
    pub const BODIES: &str = "bodies";
    pub const BIOMES: &str = "biomes";
}

/// Grid coordinate of a tile, also its identity across caches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileIndex {
    pub x: i32,
    pub y: i32,
}

impl TileIndex {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for TileIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal direction on the grid. Row 0 is the top, so `Above` is y - 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Above,
    Right,
    Below,
}

impl Direction {
    /// Fixed scan order used for every tie-break.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Above,
        Direction::Right,
        Direction::Below,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Above => Direction::Below,
            Direction::Right => Direction::Left,
            Direction::Below => Direction::Above,
        }
    }

    /// Unit step (dx, dy).
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Above => (0, -1),
            Direction::Right => (1, 0),
            Direction::Below => (0, 1),
        }
    }

    /// Position in the neighbour array and in `ALL`.
    pub fn slot(self) -> usize {
        match self {
            Direction::Left => 0,
            Direction::Above => 1,
            Direction::Right => 2,
            Direction::Below => 3,
        }
    }

    /// Bit used in adjacency bitmasks.
    pub fn bit(self) -> u8 {
        match self {
            Direction::Above => 1,
            Direction::Right => 2,
            Direction::Below => 4,
            Direction::Left => 8,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HeightData {
    /// Normalised height in [0, 1]
    pub value: f64,
    pub band: HeightBand,
    /// Land tiles are passable, open water is not
    pub passable: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HeatData {
    pub value: f64,
    pub band: HeatBand,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MoistureData {
    pub value: f64,
    pub band: MoistureBand,
}

/// Channel written by river carving.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RiverData {
    pub tree: usize,
    pub river: usize,
    pub water_level: f64,
    /// Carved floor height, always below `water_level`
    pub floor: f64,
    pub flow: Direction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BiomeData {
    pub biome: Biome,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BodyOfData {
    pub id: usize,
    pub kind: BodyKind,
}

/// One generator's result for one tile. Replaced wholesale, never edited in place.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum DataBucket {
    Height(HeightData),
    Heat(HeatData),
    Moisture(MoistureData),
    River(RiverData),
    Biome(BiomeData),
    BodyOf(BodyOfData),
}

#[derive(Clone, Debug, Default)]
pub struct Tile {
    index: TileIndex,
    /// Left, Above, Right, Below; `None` until the world wires them
    neighbors: Option<[TileIndex; 4]>,
    attributes: HashMap<String, DataBucket>,
    bitmasks: HashMap<String, u8>,
}

impl Tile {
    pub fn new(index: TileIndex) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    pub fn index(&self) -> TileIndex {
        self.index
    }

    pub fn neighbor(&self, direction: Direction) -> Option<TileIndex> {
        self.neighbors.map(|n| n[direction.slot()])
    }

    pub fn set_neighbors(&mut self, neighbors: [TileIndex; 4]) {
        self.neighbors = Some(neighbors);
    }

    pub fn attribute(&self, name: &str) -> Option<&DataBucket> {
        self.attributes.get(name)
    }

    pub fn set_attribute(&mut self, name: &str, bucket: DataBucket) {
        self.attributes.insert(name.to_string(), bucket);
    }

    pub fn bitmask(&self, name: &str) -> Option<u8> {
        self.bitmasks.get(name).copied()
    }

    pub fn set_bitmask(&mut self, name: &str, mask: u8) {
        self.bitmasks.insert(name.to_string(), mask);
    }

    pub fn height(&self) -> Option<&HeightData> {
        match self.attribute(attr::HEIGHT) {
            Some(DataBucket::Height(h)) => Some(h),
            _ => None,
        }
    }

    pub fn heat(&self) -> Option<&HeatData> {
        match self.attribute(attr::HEAT) {
            Some(DataBucket::Heat(h)) => Some(h),
            _ => None,
        }
    }

    pub fn moisture(&self) -> Option<&MoistureData> {
        match self.attribute(attr::MOISTURE) {
            Some(DataBucket::Moisture(m)) => Some(m),
            _ => None,
        }
    }

    pub fn river(&self) -> Option<&RiverData> {
        match self.attribute(attr::RIVERS) {
            Some(DataBucket::River(r)) => Some(r),
            _ => None,
        }
    }

    pub fn biome(&self) -> Option<Biome> {
        match self.attribute(attr::BIOMES) {
            Some(DataBucket::Biome(b)) => Some(b.biome),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&BodyOfData> {
        match self.attribute(attr::BODIES) {
            Some(DataBucket::BodyOf(b)) => Some(b),
            _ => None,
        }
    }

    /// Land tiles can be walked and host rivers. Tiles without height are not passable.
    pub fn is_passable(&self) -> bool {
        self.height().map_or(false, |h| h.passable)
    }

    /// Normalised height, 0.0 if absent.
    pub fn height_value(&self) -> f64 {
        self.height().map_or(0.0, |h| h.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites_round_trip() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            let (dx, dy) = dir.offset();
            let (ox, oy) = dir.opposite().offset();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn test_bitmask_bits_are_distinct() {
        let all = Direction::ALL.iter().fold(0u8, |acc, d| acc | d.bit());
        assert_eq!(all, 0b1111);
    }

    #[test]
    fn test_attribute_absent_until_set() {
        let mut tile = Tile::new(TileIndex::new(3, 4));
        assert!(tile.attribute(attr::HEIGHT).is_none());
        assert!(!tile.is_passable());

        tile.set_attribute(
            attr::HEIGHT,
            DataBucket::Height(HeightData {
                value: 0.7,
                band: HeightBand::Midlands,
                passable: true,
            }),
        );
        assert!(tile.is_passable());
        assert_eq!(tile.height_value(), 0.7);
        assert!(tile.heat().is_none());
    }

    #[test]
    fn test_bucket_replaced_wholesale() {
        let mut tile = Tile::new(TileIndex::new(0, 0));
        let wet = |value| {
            DataBucket::Moisture(MoistureData {
                value,
                band: MoistureBand::Wet,
            })
        };
        tile.set_attribute(attr::MOISTURE, wet(0.1));
        tile.set_attribute(attr::MOISTURE, wet(0.9));
        assert_eq!(tile.moisture().map(|m| m.value), Some(0.9));
    }
}
