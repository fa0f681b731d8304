//! Grouping of merging rivers into trunk and tributary trees.

use std::collections::{BTreeMap, VecDeque};

use super::river::{River, RiverOccupancy};

/// A trunk river with the subtrees that branch off it.
///
/// Keys of `branches` are mouth-first positions along the trunk.
#[derive(Clone, Debug, PartialEq)]
pub struct RiverTree {
    pub trunk: usize,
    pub branches: BTreeMap<usize, RiverTree>,
}

impl RiverTree {
    /// Ids of every river in the tree, trunk first.
    pub fn members(&self) -> Vec<usize> {
        let mut out = vec![self.trunk];
        for child in self.branches.values() {
            out.extend(child.members());
        }
        out
    }

    pub fn tributary_count(&self) -> usize {
        self.branches.len()
    }

    /// Build a tree from rivers that touch each other.
    pub fn build(rivers: &[River], members: &[usize]) -> Option<RiverTree> {
        let trunk = longest(rivers, members)?;
        let trunk_tiles: Vec<_> = rivers[trunk].mouth_first().collect();

        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for &id in members {
            if id == trunk {
                continue;
            }
            let point = rivers[id]
                .mouth_first()
                .zip(trunk_tiles.iter())
                .take_while(|(a, b)| a == *b)
                .count();
            groups.entry(point).or_default().push(id);
        }

        let branches = groups
            .into_iter()
            .filter_map(|(point, ids)| RiverTree::build(rivers, &ids).map(|t| (point, t)))
            .collect();

        Some(RiverTree { trunk, branches })
    }
}

/// Longest river among `members`; ties go to the lowest id.
fn longest(rivers: &[River], members: &[usize]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for &id in members {
        match best {
            Some(b) if rivers[id].length() < rivers[b].length() => {}
            Some(b) if rivers[id].length() == rivers[b].length() && id > b => {}
            _ => best = Some(id),
        }
    }
    best
}

/// Split committed rivers into clusters that share at least one tile.
/// Clusters come out in order of their lowest river id, members sorted.
pub fn clusters(rivers: &[River], occupancy: &RiverOccupancy) -> Vec<Vec<usize>> {
    let mut explored = vec![false; rivers.len()];
    let mut out = Vec::new();

    for root in 0..rivers.len() {
        if explored[root] {
            continue;
        }
        explored[root] = true;
        let mut cluster = vec![root];
        let mut queue = VecDeque::from([root]);

        while let Some(current) = queue.pop_front() {
            for &tile in &rivers[current].tiles {
                for &other in occupancy.rivers_at(tile) {
                    if other < rivers.len() && !explored[other] {
                        explored[other] = true;
                        cluster.push(other);
                        queue.push_back(other);
                    }
                }
            }
        }

        cluster.sort_unstable();
        out.push(cluster);
    }
    out
}

/// Build one tree per cluster.
pub fn build_trees(rivers: &[River], occupancy: &RiverOccupancy) -> Vec<RiverTree> {
    clusters(rivers, occupancy)
        .iter()
        .filter_map(|members| RiverTree::build(rivers, members))
        .collect()
}
