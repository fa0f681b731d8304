//! River sources, downhill routing and validation.

use crate::config::RiverConfig;
use crate::tile::{Direction, TileIndex};
use crate::world::World;

use super::river::{River, RiverOccupancy};

/// Tiles a river may start from, in grid order.
pub fn source_candidates(world: &World, min_height: f64) -> Vec<TileIndex> {
    world
        .tiles()
        .filter(|t| t.is_passable() && t.height_value() >= min_height)
        .map(|t| t.index())
        .collect()
}

/// Direction of the lowest neighbour; the first minimum in scan order wins.
pub fn lowest_neighbor(world: &World, index: TileIndex) -> Direction {
    let mut best = Direction::Left;
    let mut best_height = f64::INFINITY;
    for dir in Direction::ALL {
        let h = world.neighbor(index, dir).height_value();
        if h < best_height {
            best_height = h;
            best = dir;
        }
    }
    best
}

/// Number of `index`'s neighbours already on `river`.
fn river_neighbor_count(
    world: &World,
    occupancy: &RiverOccupancy,
    index: TileIndex,
    river: usize,
) -> usize {
    Direction::ALL
        .iter()
        .filter(|&&dir| {
            occupancy
                .rivers_at(world.index_in_direction(index, dir))
                .contains(&river)
        })
        .count()
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Step {
    /// Open water with no river on it
    Terminal,
    Flow(f64),
    Blocked,
}

impl Step {
    fn score(self) -> Option<f64> {
        match self {
            Step::Terminal => Some(0.0),
            Step::Flow(h) => Some(h),
            Step::Blocked => None,
        }
    }
}

fn evaluate(
    world: &World,
    occupancy: &RiverOccupancy,
    river: &River,
    current: TileIndex,
    next: TileIndex,
) -> Step {
    if next == current {
        return Step::Blocked;
    }
    let tile = world.tile_by_index(next);
    if occupancy.is_free(next) && !tile.is_passable() {
        return Step::Terminal;
    }
    if river_neighbor_count(world, occupancy, next, river.id) < 2 && !river.contains(next) {
        Step::Flow(tile.height_value())
    } else {
        Step::Blocked
    }
}

fn push(occupancy: &mut RiverOccupancy, river: &mut River, index: TileIndex, direction: Direction) {
    river.push(index, direction);
    occupancy.add(index, river.id);
}

/// Walk from `start` towards standing water, one tile per step.
///
/// Tiles are registered in `occupancy` as they are added, so a rejected river
/// must be rolled back with [`RiverOccupancy::remove`].
pub fn find_path_to_standing_water(
    world: &World,
    occupancy: &mut RiverOccupancy,
    river: &mut River,
    start: TileIndex,
    initial: Direction,
) {
    let mut current = start;
    let mut heading = initial;
    let max_steps = world.width() * world.height();

    for _ in 0..max_steps {
        if occupancy.has_other(current, river.id) {
            river.intersections += 1;
        }

        let reverse = heading.opposite();
        let mut best: Option<(Direction, Step, f64)> = None;
        for dir in Direction::ALL {
            if dir == reverse {
                continue;
            }
            let next = world.index_in_direction(current, dir);
            let step = evaluate(world, occupancy, river, current, next);
            let Some(score) = step.score() else {
                continue;
            };
            match best {
                Some((_, _, s)) if score >= s => {}
                _ => best = Some((dir, step, score)),
            }
        }

        // dead end: the stuck tile is not part of the river
        let Some((dir, step, _)) = best else {
            return;
        };

        // the mouth keeps its outflow direction, but running into water is not a turn
        if step == Step::Terminal {
            push(occupancy, river, current, dir);
            return;
        }

        if dir != heading {
            river.turn_count += 1;
            heading = dir;
        }
        push(occupancy, river, current, dir);
        current = world.index_in_direction(current, dir);
    }
}

/// Boundary-inclusive acceptance test.
pub fn is_valid(river: &River, config: &RiverConfig) -> bool {
    !river.tiles.is_empty()
        && river.turn_count >= config.min_river_turns
        && river.length() >= config.min_river_length
        && river.intersections <= config.max_river_intersections
}
