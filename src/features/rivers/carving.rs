//! Channel carving along river trees.
//!
//! Rivers are walked from the mouth towards the source. Each step stamps a
//! cross-section of `RiverData` buckets: a perpendicular strip on straight
//! runs and a quarter disc on bends.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::RiverConfig;
use crate::tile::{attr, DataBucket, Direction, RiverData, TileIndex};
use crate::world::World;

use super::river::River;
use super::tree::RiverTree;

/// Disc offsets per radius, built on first use.
#[derive(Default)]
pub struct DiscPatterns {
    by_radius: Vec<Vec<(i32, i32)>>,
}

impl DiscPatterns {
    /// All (dx, dy) with dx^2 + dy^2 <= r^2.
    pub fn offsets(&mut self, radius: usize) -> &[(i32, i32)] {
        while self.by_radius.len() <= radius {
            let r = self.by_radius.len() as i32;
            let mut pattern = Vec::new();
            for dy in -r..=r {
                for dx in -r..=r {
                    if dx * dx + dy * dy <= r * r {
                        pattern.push((dx, dy));
                    }
                }
            }
            self.by_radius.push(pattern);
        }
        &self.by_radius[radius]
    }
}

pub struct Carver<'a> {
    world: &'a mut World,
    rng: &'a mut ChaCha8Rng,
    config: &'a RiverConfig,
    discs: DiscPatterns,
}

impl<'a> Carver<'a> {
    pub fn new(world: &'a mut World, rng: &'a mut ChaCha8Rng, config: &'a RiverConfig) -> Self {
        Self {
            world,
            rng,
            config,
            discs: DiscPatterns::default(),
        }
    }

    /// Carve a tree's trunk from `start`, then each branch from its branch point.
    pub fn dig_tree(
        &mut self,
        rivers: &mut [River],
        tree: &RiverTree,
        tree_id: usize,
        start: usize,
        max_width: usize,
    ) {
        self.dig_river(&mut rivers[tree.trunk], tree.tributary_count(), tree_id, start, max_width);

        for (&point, child) in &tree.branches {
            let width = rivers[tree.trunk].radius_at(point);
            self.dig_tree(rivers, child, tree_id, point, width);
        }
    }

    fn dig_river(
        &mut self,
        river: &mut River,
        tributaries: usize,
        tree_id: usize,
        start: usize,
        max_width: usize,
    ) {
        let length = river.length();
        if start >= length {
            return;
        }

        let radius = self.rng.gen_range(1..=max_width.max(1)) + tributaries;
        river.cross_section = radius;
        river.radius_steps = self.step_changes(start, length, radius);

        let tiles: Vec<TileIndex> = river.mouth_first().collect();
        let directions: Vec<Direction> = river.directions.iter().rev().copied().collect();

        for i in start..length {
            let outgoing = directions[i];
            let incoming = directions.get(i + 1).copied().unwrap_or(outgoing);
            let data = Stamp {
                tree: tree_id,
                river: river.id,
                radius: river.radius_at(i),
                mouth: i == 0,
            };
            self.dig_tile(tiles[i], incoming, outgoing, data);
        }
    }

    /// Mouth-first indices where the radius drops, spaced by the buffer.
    fn step_changes(&mut self, start: usize, length: usize, radius: usize) -> Vec<usize> {
        let span = length - start;
        let buffer = (span as f64 * self.config.buffer_fraction).round() as usize;

        let mut steps = Vec::with_capacity(radius.saturating_sub(1));
        let mut current = start;
        for k in 1..radius {
            let low = current + buffer;
            let high = (length - 1).saturating_sub(buffer * (radius - k)).max(low);
            current = self.rng.gen_range(low..=high);
            steps.push(current);
        }
        steps
    }

    fn dig_tile(&mut self, center: TileIndex, incoming: Direction, outgoing: Direction, stamp: Stamp) {
        let r = stamp.radius as i32;

        let sample_reach = r + self.config.height_sample_buffer as i32;
        let samples = self.strip(center, outgoing, sample_reach);
        let average = samples
            .iter()
            .map(|&(t, _)| self.world.tile_by_index(t).height_value())
            .sum::<f64>()
            / samples.len() as f64;

        let water_level = average - self.config.water_level_below_average;
        let allowed_depth = stamp.radius as f64 / 100.0;

        let footprint = if incoming == outgoing {
            self.strip(center, outgoing, r - 1)
        } else {
            self.corner(center, incoming, outgoing, stamp.radius)
        };

        let jitter = self.config.depth_jitter;
        let mut dug = Vec::with_capacity(footprint.len());
        for (index, distance) in footprint {
            let profile = 1.0 - distance / stamp.radius as f64;
            let noise = if jitter > 0.0 {
                self.rng.gen_range(-jitter..=jitter)
            } else {
                0.0
            };
            let modifier = (profile + noise).clamp(0.0, 1.0);
            let data = RiverData {
                tree: stamp.tree,
                river: stamp.river,
                water_level,
                floor: water_level - allowed_depth * modifier,
                flow: outgoing,
            };
            self.write(index, data);
            dug.push((index, data));
        }

        if stamp.mouth {
            self.extend_to_water(&dug, outgoing);
        }
    }

    /// Tiles across the flow at offsets -reach..=reach, with their distance from centre.
    fn strip(&self, center: TileIndex, flow: Direction, reach: i32) -> Vec<(TileIndex, f64)> {
        (-reach..=reach)
            .map(|d| {
                let (dx, dy) = if flow.is_horizontal() { (0, d) } else { (d, 0) };
                (
                    self.world.sanitize(center.x + dx, center.y + dy),
                    d.abs() as f64,
                )
            })
            .collect()
    }

    /// Quarter disc on the outer side of a bend.
    fn corner(
        &mut self,
        center: TileIndex,
        incoming: Direction,
        outgoing: Direction,
        radius: usize,
    ) -> Vec<(TileIndex, f64)> {
        let (ix, iy) = incoming.offset();
        let (ox, oy) = outgoing.opposite().offset();
        let (sx, sy) = (ix + ox, iy + oy);

        let offsets: Vec<(i32, i32)> = self
            .discs
            .offsets(radius)
            .iter()
            .copied()
            .filter(|&(dx, dy)| dx * sx >= 0 && dy * sy >= 0)
            .collect();

        offsets
            .into_iter()
            .map(|(dx, dy)| {
                (
                    self.world.sanitize(center.x + dx, center.y + dy),
                    ((dx * dx + dy * dy) as f64).sqrt(),
                )
            })
            .collect()
    }

    /// Keep digging each mouth tile in the flow direction until open water.
    fn extend_to_water(&mut self, dug: &[(TileIndex, RiverData)], flow: Direction) {
        let limit = self.world.width().max(self.world.height());
        for &(start, data) in dug {
            let mut index = start;
            for _ in 0..limit {
                index = self.world.index_in_direction(index, flow);
                if !self.world.tile_by_index(index).is_passable() {
                    break;
                }
                self.write(index, data);
            }
        }
    }

    /// Deeper floor wins when a tile is carved twice.
    fn write(&mut self, index: TileIndex, data: RiverData) {
        let tile = self.world.tile_by_index_mut(index);
        if let Some(existing) = tile.river() {
            if existing.floor <= data.floor {
                return;
            }
        }
        tile.set_attribute(attr::RIVERS, DataBucket::River(data));
    }
}

#[derive(Clone, Copy)]
struct Stamp {
    tree: usize,
    river: usize,
    radius: usize,
    mouth: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::rivers::test_support::world_from;
    use rand::SeedableRng;

    fn straight_river(id: usize, y: i32, xs: std::ops::Range<i32>) -> River {
        let mut river = River::new(id);
        for x in xs {
            river.push(TileIndex::new(x, y), Direction::Right);
        }
        river
    }

    #[test]
    fn test_disc_patterns() {
        let mut discs = DiscPatterns::default();
        assert_eq!(discs.offsets(0), &[(0, 0)]);
        assert_eq!(discs.offsets(1).len(), 5);
        assert_eq!(discs.offsets(2).len(), 13);
        assert!(discs.offsets(3).iter().all(|&(x, y)| x * x + y * y <= 9));
    }

    #[test]
    fn test_straight_channel_is_carved_below_water() {
        let mut world = world_from(24, 12, |x, _| if x >= 20 { 0.1 } else { 0.8 });
        let config = RiverConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut rivers = vec![straight_river(0, 6, 2..20)];
        let tree = RiverTree {
            trunk: 0,
            branches: Default::default(),
        };

        Carver::new(&mut world, &mut rng, &config).dig_tree(&mut rivers, &tree, 0, 0, 3);

        let river = &rivers[0];
        assert!((1..=3).contains(&river.cross_section));
        for &index in &river.tiles {
            let data = world.tile_by_index(index).river().expect("river tile carved");
            assert!(data.floor <= data.water_level);
            assert!(data.water_level < 0.8);
            assert_eq!(data.flow, Direction::Right);
        }
        // nothing above or below the widest possible channel
        assert!(world.tile(10, 1).river().is_none());
        assert!(world.tile(10, 11).river().is_none());
    }

    #[test]
    fn test_radius_never_widens_upstream() {
        let mut world = world_from(64, 8, |x, _| if x >= 60 { 0.1 } else { 0.8 });
        let config = RiverConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut rivers = vec![straight_river(0, 4, 0..60)];
        let tree = RiverTree {
            trunk: 0,
            branches: Default::default(),
        };

        Carver::new(&mut world, &mut rng, &config).dig_tree(&mut rivers, &tree, 0, 0, 5);

        let river = &rivers[0];
        let radii: Vec<usize> = (0..river.length()).map(|i| river.radius_at(i)).collect();
        assert!(radii.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(radii[0], river.cross_section);
    }

    #[test]
    fn test_deeper_floor_wins() {
        let mut world = world_from(4, 4, |_, _| 0.8);
        let config = RiverConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut carver = Carver::new(&mut world, &mut rng, &config);
        let index = TileIndex::new(1, 1);
        let data = |floor| RiverData {
            tree: 0,
            river: 0,
            water_level: 0.7,
            floor,
            flow: Direction::Left,
        };

        carver.write(index, data(0.65));
        carver.write(index, data(0.68));
        carver.write(index, data(0.6));
        assert_eq!(world.tile_by_index(index).river().unwrap().floor, 0.6);
    }

    #[test]
    fn test_mouth_extends_to_water() {
        // land up to x = 15, river mouth at x = 5 pointing right
        let mut world = world_from(20, 5, |x, _| if x >= 16 { 0.1 } else { 0.8 });
        let config = RiverConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut rivers = vec![straight_river(0, 2, 0..6)];
        let tree = RiverTree {
            trunk: 0,
            branches: Default::default(),
        };

        Carver::new(&mut world, &mut rng, &config).dig_tree(&mut rivers, &tree, 0, 0, 1);

        for x in 0..16 {
            assert!(world.tile(x, 2).river().is_some(), "x = {} should be carved", x);
        }
        assert!(world.tile(16, 2).river().is_none());
    }

    fn offsets_from(center: TileIndex, footprint: &[(TileIndex, f64)]) -> Vec<(i32, i32)> {
        let mut offsets: Vec<(i32, i32)> = footprint
            .iter()
            .map(|(t, _)| (t.x - center.x, t.y - center.y))
            .collect();
        offsets.sort();
        offsets
    }

    #[test]
    fn test_bend_stamps_outer_quarter_disc() {
        let mut world = world_from(16, 12, |_, _| 0.8);
        let config = RiverConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut carver = Carver::new(&mut world, &mut rng, &config);
        let center = TileIndex::new(8, 5);

        // flowing right, turning down: the outside of the bend is up and to the right
        let footprint = carver.corner(center, Direction::Right, Direction::Below, 2);
        assert_eq!(
            offsets_from(center, &footprint),
            vec![(0, -2), (0, -1), (0, 0), (1, -1), (1, 0), (2, 0)]
        );
        let diagonal = footprint
            .iter()
            .find(|(t, _)| *t == TileIndex::new(9, 4))
            .map(|&(_, d)| d);
        assert_eq!(diagonal, Some(2f64.sqrt()));

        // flowing down, turning right: the outside is down and to the left
        let footprint = carver.corner(center, Direction::Below, Direction::Right, 2);
        assert_eq!(
            offsets_from(center, &footprint),
            vec![(-2, 0), (-1, 0), (-1, 1), (0, 0), (0, 1), (0, 2)]
        );
    }

    #[test]
    fn test_bend_leaves_inner_side_dry() {
        let mut world = world_from(16, 12, |_, _| 0.8);
        let config = RiverConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let stamp = Stamp {
            tree: 0,
            river: 0,
            radius: 2,
            mouth: false,
        };
        Carver::new(&mut world, &mut rng, &config).dig_tile(
            TileIndex::new(8, 5),
            Direction::Right,
            Direction::Below,
            stamp,
        );

        let mut carved: Vec<(i32, i32)> = world
            .tiles()
            .filter(|t| t.river().is_some())
            .map(|t| (t.index().x, t.index().y))
            .collect();
        carved.sort();
        assert_eq!(carved, vec![(8, 3), (8, 4), (8, 5), (9, 4), (9, 5), (10, 5)]);
        for (x, y) in [(7, 5), (7, 6), (8, 6), (9, 6), (7, 4)] {
            assert!(world.tile(x, y).river().is_none(), "({}, {}) is inside the bend", x, y);
        }
        let data = world.tile(8, 5).river().unwrap();
        assert_eq!(data.flow, Direction::Below);
        assert!(data.floor < data.water_level);
    }

    #[test]
    fn test_zero_jitter_gives_exact_profile() {
        let mut world = world_from(16, 12, |_, _| 0.8);
        let config = RiverConfig {
            depth_jitter: 0.0,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let stamp = Stamp {
            tree: 0,
            river: 0,
            radius: 2,
            mouth: false,
        };
        Carver::new(&mut world, &mut rng, &config).dig_tile(
            TileIndex::new(8, 5),
            Direction::Right,
            Direction::Right,
            stamp,
        );

        let centre = world.tile(8, 5).river().unwrap();
        let edge = world.tile(8, 6).river().unwrap();
        // depth allowed at radius 2 is 0.02; the edge tile sits halfway out
        assert!((centre.water_level - centre.floor - 0.02).abs() < 1e-12);
        assert!((edge.water_level - edge.floor - 0.01).abs() < 1e-12);
        assert!(world.tile(8, 7).river().is_none());
    }
}
