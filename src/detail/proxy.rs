//! Per-field neighbour distributions.

use crate::model::GroupId;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Neighbourhood queries needed by the detail analysis.
///
/// "Found active" fields are known to be active but take part in no rule;
/// they shift every distribution of their neighbours by one.
pub trait NeighborFind<T> {
    /// Every neighbour of `field`, whether or not it is in a rule.
    fn neighbors_of(&self, field: &T) -> Vec<T>;

    /// Returns `true` if `field` is already known to be active.
    fn is_found_active(&self, field: &T) -> bool;
}

/// Distribution of the number of active neighbours of one field.
///
/// `probabilities()[k]` is the probability that the field itself is
/// inactive and exactly `k` of its neighbours are active. The entries sum to
/// one minus the field's own probability.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldProxy<T> {
    pub(crate) field: T,
    pub(crate) group: GroupId,
    pub(crate) found: usize,
    pub(crate) neighbors: Vec<(GroupId, usize)>,
    pub(crate) probabilities: Arc<[f64]>,
}

impl<T> FieldProxy<T> {
    /// The field this proxy describes.
    pub fn field(&self) -> &T {
        &self.field
    }

    /// Group of the field itself.
    pub fn group(&self) -> GroupId {
        self.group
    }

    /// Neighbours already known to be active.
    pub fn found(&self) -> usize {
        self.found
    }

    /// Number of undecided neighbours per group, ordered by group id.
    ///
    /// Groups that are never active are left out.
    pub fn neighbors(&self) -> &[(GroupId, usize)] {
        &self.neighbors
    }

    /// Probability of each number of active neighbours, with the field itself inactive.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Total number of neighbours, including inactive and found ones.
    pub fn neighbor_count(&self) -> usize {
        self.probabilities.len().saturating_sub(1)
    }
}

/// Output of [`AnalyzeResult::analyze_detailed`](crate::AnalyzeResult::analyze_detailed).
///
/// Fields with the same group, the same neighbour counts per group and the
/// same numbers of found and total neighbours have identical distributions;
/// each such class is computed once and shared.
#[derive(Debug, Clone)]
pub struct DetailedResults<T> {
    pub(crate) proxies: Vec<FieldProxy<T>>,
    pub(crate) index: HashMap<T, usize>,
    pub(crate) proxy_count: usize,
}

impl<T: Eq + Hash> DetailedResults<T> {
    /// Distribution for `field`, `None` for fields in no group.
    pub fn proxy_for(&self, field: &T) -> Option<&FieldProxy<T>> {
        self.index.get(field).map(|&i| &self.proxies[i])
    }

    /// Every proxy, in the field order of the analysis.
    pub fn proxies(&self) -> &[FieldProxy<T>] {
        &self.proxies
    }

    /// Number of distinct distributions that were computed.
    pub fn proxy_count(&self) -> usize {
        self.proxy_count
    }
}
