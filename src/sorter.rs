//! Dependency ordering for named generators
//!
//! Items refer to each other by name (case-insensitive). The order is built by
//! repeatedly removing a vertex whose dependencies have all been placed, using a
//! dense adjacency matrix. Generator counts are small, so the cubic worst case
//! is irrelevant.

use crate::error::SortError;

/// Anything that can be placed by the sorter.
pub trait Named {
    fn name(&self) -> &str;

    /// Names of the items that must come first.
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Produce a dependency-respecting order of `items`.
///
/// Returns positions into `items`. Among the items that are ready at any point
/// the earliest one in input order is taken, so the result is stable.
pub fn sort_by_name<T: Named + ?Sized>(items: &[&T]) -> Result<Vec<usize>, SortError> {
    let names: Vec<String> = items.iter().map(|i| i.name().to_lowercase()).collect();

    for (i, name) in names.iter().enumerate() {
        if names[..i].contains(name) {
            return Err(SortError::DuplicateName(items[i].name().to_string()));
        }
    }

    let n = items.len();
    // edges[i][j]: item i depends on item j
    let mut edges = vec![vec![false; n]; n];
    for (i, item) in items.iter().enumerate() {
        for dep in item.dependencies() {
            let key = dep.to_lowercase();
            match names.iter().position(|n| *n == key) {
                Some(j) => edges[i][j] = true,
                None => {
                    return Err(SortError::MissingDependency {
                        item: item.name().to_string(),
                        dependency: dep,
                    })
                }
            }
        }
    }

    let mut removed = vec![false; n];
    let mut order = Vec::with_capacity(n);

    while order.len() < n {
        let ready = (0..n).find(|&i| !removed[i] && !edges[i].iter().any(|&e| e));

        let Some(v) = ready else {
            let remaining = (0..n)
                .filter(|&i| !removed[i])
                .map(|i| items[i].name().to_string())
                .collect();
            return Err(SortError::Cycle { remaining });
        };

        order.push(v);
        removed[v] = true;
        for row in edges.iter_mut() {
            row[v] = false;
        }
    }

    Ok(order)
}
