//! River paths and the tile-to-river cache.

use crate::tile::{Direction, TileIndex};
use crate::tilemap::Tilemap;

/// One river, stored source first.
#[derive(Clone, Debug, PartialEq)]
pub struct River {
    pub id: usize,
    pub tiles: Vec<TileIndex>,
    /// Flow direction leaving the tile at the same position
    pub directions: Vec<Direction>,
    pub turn_count: usize,
    /// Steps onto tiles already owned by another river
    pub intersections: usize,
    /// Base radius, set when the river is carved
    pub cross_section: usize,
    /// Mouth-first indices where the radius drops by one
    pub radius_steps: Vec<usize>,
}

impl River {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            tiles: Vec::new(),
            directions: Vec::new(),
            turn_count: 0,
            intersections: 0,
            cross_section: 0,
            radius_steps: Vec::new(),
        }
    }

    pub fn length(&self) -> usize {
        self.tiles.len()
    }

    pub fn contains(&self, index: TileIndex) -> bool {
        self.tiles.contains(&index)
    }

    pub fn source(&self) -> Option<TileIndex> {
        self.tiles.first().copied()
    }

    pub fn mouth(&self) -> Option<TileIndex> {
        self.tiles.last().copied()
    }

    pub(crate) fn push(&mut self, index: TileIndex, direction: Direction) {
        self.tiles.push(index);
        self.directions.push(direction);
    }

    /// Tiles from the mouth back to the source.
    pub fn mouth_first(&self) -> impl Iterator<Item = TileIndex> + '_ {
        self.tiles.iter().rev().copied()
    }

    /// Radius at a mouth-first position, never below 1.
    pub fn radius_at(&self, mouth_index: usize) -> usize {
        let dropped = self.radius_steps.iter().filter(|&&s| s <= mouth_index).count();
        self.cross_section.saturating_sub(dropped).max(1)
    }
}

/// Which rivers run through each tile.
#[derive(Clone, Debug)]
pub struct RiverOccupancy {
    rivers: Tilemap<Vec<usize>>,
}

impl RiverOccupancy {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            rivers: Tilemap::new(width, height),
        }
    }

    pub fn rivers_at(&self, index: TileIndex) -> &[usize] {
        self.rivers.get_wrapped(index.x as i64, index.y as i64)
    }

    pub fn is_free(&self, index: TileIndex) -> bool {
        self.rivers_at(index).is_empty()
    }

    /// True when a river other than `river` owns the tile.
    pub fn has_other(&self, index: TileIndex, river: usize) -> bool {
        self.rivers_at(index).iter().any(|&r| r != river)
    }

    pub fn add(&mut self, index: TileIndex, river: usize) {
        let entry = self.rivers.get_wrapped_mut(index.x as i64, index.y as i64);
        if !entry.contains(&river) {
            entry.push(river);
        }
    }

    /// Remove every association of `river` along `tiles`.
    pub fn remove(&mut self, tiles: &[TileIndex], river: usize) {
        for index in tiles {
            self.rivers
                .get_wrapped_mut(index.x as i64, index.y as i64)
                .retain(|&r| r != river);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_steps_narrow_towards_source() {
        let mut river = River::new(0);
        river.cross_section = 3;
        river.radius_steps = vec![4, 9];

        assert_eq!(river.radius_at(0), 3);
        assert_eq!(river.radius_at(3), 3);
        assert_eq!(river.radius_at(4), 2);
        assert_eq!(river.radius_at(9), 1);
        assert_eq!(river.radius_at(50), 1);
    }

    #[test]
    fn test_occupancy_add_and_rollback() {
        let mut occupancy = RiverOccupancy::new(4, 4);
        let tiles = [TileIndex::new(0, 0), TileIndex::new(1, 0)];
        occupancy.add(tiles[0], 0);
        occupancy.add(tiles[0], 1);
        occupancy.add(tiles[1], 1);
        occupancy.add(tiles[1], 1);

        assert_eq!(occupancy.rivers_at(tiles[1]), &[1]);
        assert!(occupancy.has_other(tiles[0], 1));
        assert!(!occupancy.has_other(tiles[1], 1));

        occupancy.remove(&tiles, 1);
        assert_eq!(occupancy.rivers_at(tiles[0]), &[0]);
        assert!(occupancy.is_free(tiles[1]));
    }

    #[test]
    fn test_mouth_first_order() {
        let mut river = River::new(2);
        river.push(TileIndex::new(0, 0), Direction::Right);
        river.push(TileIndex::new(1, 0), Direction::Below);
        assert_eq!(river.mouth(), Some(TileIndex::new(1, 0)));
        assert_eq!(
            river.mouth_first().collect::<Vec<_>>(),
            vec![TileIndex::new(1, 0), TileIndex::new(0, 0)]
        );
    }
}
