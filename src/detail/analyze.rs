//! Hypergeometric convolution of neighbour groups.

use super::{DetailedResults, FieldProxy, NeighborFind};
use crate::analysis::AnalyzeResult;
use crate::combinatorics::hypergeometric;
use crate::model::GroupId;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::Arc;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Everything the shape of a field's distribution depends on.
///
/// Found-active neighbours only shift the distribution and the total
/// neighbour count only pads it, so both stay per field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ProxyKey {
    group: GroupId,
    neighbors: Vec<(GroupId, usize)>,
}

/// Where one field places its class distribution.
#[derive(Debug, Clone, Copy)]
struct Placement {
    slot: usize,
    found: usize,
    neighbor_total: usize,
}

impl<T: Clone + Eq + Hash> AnalyzeResult<T> {
    /// Computes, for every field, the distribution of its number of active
    /// neighbours given that the field itself is inactive.
    ///
    /// For each solution, the neighbours in each group are treated as a
    /// hypergeometric draw from that group (the field's own group shrinks
    /// by the field itself), and the per-group draws are convolved.
    pub fn analyze_detailed<N: NeighborFind<T>>(&self, neighbor_find: &N) -> DetailedResults<T> {
        let fields = self.fields();
        let mut keys: Vec<ProxyKey> = Vec::new();
        let mut key_index: HashMap<ProxyKey, usize> = HashMap::new();
        let mut placements = Vec::with_capacity(fields.len());

        for field in &fields {
            let Some(group) = self.group_for(field) else {
                continue;
            };
            let (key, found, neighbor_total) = self.proxy_key(field, group, neighbor_find);
            let next = keys.len();
            let slot = *key_index.entry(key.clone()).or_insert(next);
            if slot == next {
                keys.push(key);
            }
            placements.push((
                field.clone(),
                Placement {
                    slot,
                    found,
                    neighbor_total,
                },
            ));
        }

        let sizes: Vec<usize> = self.groups().iter().map(|g| g.len()).collect();
        let values: Vec<(&[usize], f64)> = self
            .solutions()
            .iter()
            .map(|s| (s.values(), s.probability()))
            .collect();

        #[cfg(feature = "parallel")]
        let distributions: Vec<Arc<[f64]>> = keys
            .par_iter()
            .map(|key| distribution(key, &sizes, &values))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let distributions: Vec<Arc<[f64]>> = keys
            .iter()
            .map(|key| distribution(key, &sizes, &values))
            .collect();

        let mut index = HashMap::with_capacity(placements.len());
        let proxies: Vec<FieldProxy<T>> = placements
            .into_iter()
            .enumerate()
            .map(|(i, (field, placement))| {
                index.entry(field.clone()).or_insert(i);
                let key = &keys[placement.slot];
                FieldProxy {
                    field,
                    group: key.group,
                    found: placement.found,
                    neighbors: key.neighbors.clone(),
                    probabilities: place(&distributions[placement.slot], placement),
                }
            })
            .collect();

        debug!(
            event = "detail_analyzed",
            fields = proxies.len(),
            proxies = keys.len(),
            solutions = values.len(),
        );
        DetailedResults {
            proxies,
            index,
            proxy_count: keys.len(),
        }
    }

    /// The class key of `field`, its found-active neighbours and its total
    /// number of neighbours.
    fn proxy_key<N: NeighborFind<T>>(
        &self,
        field: &T,
        group: GroupId,
        neighbor_find: &N,
    ) -> (ProxyKey, usize, usize) {
        let all = neighbor_find.neighbors_of(field);
        let mut found = 0;
        let mut per_group: BTreeMap<GroupId, usize> = BTreeMap::new();
        for neighbor in &all {
            if neighbor_find.is_found_active(neighbor) {
                found += 1;
                continue;
            }
            let Some(neighbor_group) = self.group_for(neighbor) else {
                continue;
            };
            if self.group_probability(neighbor_group) == 0.0 {
                continue;
            }
            *per_group.entry(neighbor_group).or_insert(0) += 1;
        }
        let key = ProxyKey {
            group,
            neighbors: per_group.into_iter().collect(),
        };
        (key, found, all.len())
    }
}

/// Shifts a class distribution by the found-active neighbours and pads it
/// to one entry per possible neighbour count.
fn place(class: &Arc<[f64]>, placement: Placement) -> Arc<[f64]> {
    if placement.found == 0 && class.len() == placement.neighbor_total + 1 {
        return Arc::clone(class);
    }
    let mut probabilities = vec![0.0; placement.neighbor_total + 1];
    probabilities[placement.found..placement.found + class.len()].copy_from_slice(class);
    probabilities.into()
}

/// Probability of each count of active unknown neighbours for one class
/// of fields.
///
/// Every solution contributes its exact share of the total, split over the
/// neighbour counts by the hypergeometric probabilities of its groups, so
/// no intermediate value scales with the number of assignments.
fn distribution(key: &ProxyKey, sizes: &[usize], solutions: &[(&[usize], f64)]) -> Arc<[f64]> {
    let drawn: usize = key.neighbors.iter().map(|&(_, count)| count).sum();
    let mut probabilities = vec![0.0; drawn + 1];
    let own = key.group.index();

    for &(values, share) in solutions {
        // the field itself is inactive: C(size - 1, active) / C(size, active)
        let (own_size, own_active) = (sizes[own], values[own]);
        let inactive = (own_size - own_active) as f64 / own_size as f64;
        let weight = share * inactive;
        if weight == 0.0 {
            continue;
        }
        // probability indexed by the number of active neighbours so far
        let mut ways = vec![weight];
        for &(group, neighbors) in &key.neighbors {
            let g = group.index();
            let size = if g == own { sizes[g] - 1 } else { sizes[g] };
            let active = values[g];
            let lo = active.saturating_sub(size.saturating_sub(neighbors));
            let hi = neighbors.min(active);
            let mut next = vec![0.0; ways.len() + neighbors];
            for k in lo..=hi {
                let factor = hypergeometric(size as i64, active as i64, neighbors as i64, k as i64);
                if factor == 0.0 {
                    continue;
                }
                for (m, w) in ways.iter().enumerate() {
                    next[m + k] += w * factor;
                }
            }
            ways = next;
        }
        for (m, w) in ways.into_iter().enumerate() {
            probabilities[m] += w;
        }
    }
    probabilities.into()
}

#[cfg(test)]
mod tests {
    use crate::solve;
    use crate::test_utils::{beyond_f64_range, Board, Line};

    fn assert_distribution(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn test_detail_small_board() {
        let board = Board::parse(&["___", "_x_", "2_3", "_xx", "xx_"], 0);
        let result = solve(board.rules()).unwrap();
        let detail = result.analyze_detailed(&board);
        assert_eq!(detail.proxy_count(), 7);

        let field12 = detail.proxy_for(&(1, 2)).unwrap();
        assert_distribution(
            field12.probabilities(),
            &[0.0, 0.0, 0.0, 0.23809523809523808, 0.19047619047619047, 0.0, 0.0, 0.0, 0.0],
        );
        let field20 = detail.proxy_for(&(2, 0)).unwrap();
        assert_distribution(
            field20.probabilities(),
            &[0.047619047619047616, 0.30158730158730157, 0.2857142857142857, 0.07936507936507936],
        );
        let field03 = detail.proxy_for(&(0, 3)).unwrap();
        assert_distribution(
            field03.probabilities(),
            &[
                0.031746031746031744,
                0.2698412698412698,
                0.38095238095238093,
                0.15873015873015872,
                0.015873015873015872,
                0.0,
            ],
        );
        assert_eq!(field03.neighbor_count(), 5);
    }

    #[test]
    fn test_distribution_sums_to_inactive_probability() {
        let board = Board::parse(&["___", "_x_", "2_3", "_xx", "xx_"], 0);
        let result = solve(board.rules()).unwrap();
        let detail = result.analyze_detailed(&board);
        assert_eq!(detail.proxies().len(), result.fields().len());
        for proxy in detail.proxies() {
            let sum: f64 = proxy.probabilities().iter().sum();
            let inactive = 1.0 - result.field_probability(proxy.field()).unwrap();
            assert!(
                (sum - inactive).abs() < 1e-9,
                "{:?}: {sum} vs {inactive}",
                proxy.field()
            );
        }
    }

    #[test]
    fn test_detail_shares_equal_classes() {
        let board = Board::parse(
            &[
                "________",
                "________",
                "_____xx_",
                "___13x__",
                "____x___",
                "____xx__",
                "________",
            ],
            0,
        );
        let result = solve(board.rules()).unwrap();
        let detail = result.analyze_detailed(&board);
        assert_eq!(detail.proxy_count(), 18);
        let a = detail.proxy_for(&(1, 1)).unwrap();
        let b = detail.proxy_for(&(1, 5)).unwrap();
        assert_eq!(a.probabilities(), b.probabilities());
        assert_eq!(a.group(), b.group());
    }

    #[test]
    fn test_found_neighbors_shift_distribution() {
        // the known active field sits next to every unknown field
        let board = Board::parse(&["_!_", "_1_"], -1);
        let result = solve(board.rules()).unwrap();
        assert_eq!(result.total(), 1.0);
        let detail = result.analyze_detailed(&board);
        // every unknown field shares one class, shifted by its found neighbour
        assert_eq!(detail.proxy_count(), 1);
        let corner = detail.proxy_for(&(0, 0)).unwrap();
        assert_eq!(corner.found(), 1);
        assert_distribution(corner.probabilities(), &[0.0, 1.0, 0.0, 0.0]);
        let below = detail.proxy_for(&(2, 1)).unwrap();
        assert_eq!(below.probabilities(), corner.probabilities());
    }

    #[test]
    fn test_class_shared_across_found_and_border() {
        let board = Board::parse(&["!1___", "_____"], -1);
        let result = solve(board.rules()).unwrap();
        let detail = result.analyze_detailed(&board);
        assert_eq!(detail.proxy_count(), 1);

        let edge = detail.proxy_for(&(0, 1)).unwrap();
        assert_eq!(edge.found(), 1);
        assert_distribution(edge.probabilities(), &[0.0, 1.0, 0.0, 0.0]);
        let inner = detail.proxy_for(&(2, 1)).unwrap();
        assert_eq!(inner.found(), 0);
        assert_distribution(inner.probabilities(), &[1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(edge.group(), inner.group());
    }

    #[test]
    fn test_unknown_field_has_no_proxy() {
        let board = Board::parse(&["___", "_1_", "___"], -1);
        let result = solve(board.rules()).unwrap();
        let detail = result.analyze_detailed(&board);
        assert!(detail.proxy_for(&(1, 1)).is_none());
        assert!(detail.proxy_for(&(9, 9)).is_none());
    }

    #[test]
    fn test_detail_beyond_f64_range() {
        let result = solve(beyond_f64_range()).unwrap();
        assert!(result.total().is_infinite());
        let detail = result.analyze_detailed(&Line);
        for field in [0, 2, 3, 10, 1999] {
            let proxy = detail.proxy_for(&field).unwrap();
            assert!(proxy.probabilities().iter().all(|p| p.is_finite()));
            let sum: f64 = proxy.probabilities().iter().sum();
            let inactive = 1.0 - result.field_probability(&field).unwrap();
            assert!((sum - inactive).abs() < 1e-9, "{field}: {sum} vs {inactive}");
        }
        // both neighbours of 10 are in the large group, about half active
        let middle = detail.proxy_for(&10).unwrap().probabilities().to_vec();
        assert_eq!(middle.len(), 3);
        assert!(middle.iter().all(|&p| p > 0.1), "{middle:?}");
    }
}
