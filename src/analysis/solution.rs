//! A single consistent assignment of group counts.

use crate::combinatorics::{ratio_to_f64, specific_combination, BinomialTable};
use crate::error::{invalid, Result};
use crate::model::{FieldGroup, GroupId};
use num_bigint::{BigInt, BigUint};
use num_traits::{FromPrimitive, One, ToPrimitive, Zero};
use rand::Rng;
use std::fmt;
use std::sync::Arc;

/// One way to satisfy every rule, expressed as the number of active fields
/// in each group.
///
/// A solution stands for `Π C(size, count)` concrete assignments, its
/// [`combinations`](Self::combinations). It shares the group list with the
/// [`AnalyzeResult`](super::AnalyzeResult) it belongs to, so it can decode
/// its own assignments.
#[derive(Debug, Clone)]
pub struct Solution<T> {
    groups: Arc<[FieldGroup<T>]>,
    /// Active count per group, indexed by [`GroupId::index`].
    values: Vec<usize>,
    combinations_exact: BigUint,
    combinations: f64,
    probability: f64,
}

impl<T> Solution<T> {
    pub(crate) fn new(
        groups: Arc<[FieldGroup<T>]>,
        values: Vec<usize>,
        table: &mut BinomialTable,
    ) -> Self {
        let mut weight = BigUint::one();
        for (group, &count) in groups.iter().zip(&values) {
            weight *= table.get(group.len(), count);
        }
        let combinations = weight.to_f64().unwrap_or(f64::INFINITY);
        Self {
            groups,
            values,
            combinations_exact: weight,
            combinations,
            probability: 0.0,
        }
    }

    /// Fixes the probability once the total over all solutions is known.
    pub(crate) fn set_total(&mut self, total: &BigUint) {
        self.probability = if total.is_zero() {
            0.0
        } else {
            ratio_to_f64(&self.combinations_exact, total)
        };
    }

    /// Active count per group, indexed by [`GroupId::index`].
    pub fn values(&self) -> &[usize] {
        &self.values
    }

    /// Active count of one group.
    pub fn value(&self, group: GroupId) -> usize {
        self.values[group.index()]
    }

    /// `(group, count)` for every group.
    pub fn set_group_values(&self) -> Vec<(GroupId, usize)> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &count)| (GroupId(i), count))
            .collect()
    }

    /// Number of concrete assignments, as `f64`.
    pub fn combinations(&self) -> f64 {
        self.combinations
    }

    /// Exact number of concrete assignments.
    pub fn combinations_exact(&self) -> &BigUint {
        &self.combinations_exact
    }

    /// Share of this solution in the total of its analysis.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// The groups of the analysis, indexed by [`GroupId::index`].
    pub fn groups(&self) -> &[FieldGroup<T>] {
        &self.groups
    }
}

impl<T: Clone> Solution<T> {
    /// Returns the active fields of the `rank`-th concrete assignment.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` unless `rank` is an integer in
    /// `[0, combinations)`.
    pub fn combination(&self, rank: f64) -> Result<Vec<T>> {
        if rank.fract() != 0.0 || rank < 0.0 {
            return Err(invalid(format!(
                "combination rank must be a non-negative integer, was {rank}"
            )));
        }
        let exact = BigUint::from_f64(rank)
            .ok_or_else(|| invalid(format!("combination rank {rank} is not finite")))?;
        self.combination_exact(&exact)
    }

    /// Exact variant of [`combination`](Self::combination).
    ///
    /// The rank is decoded as a mixed-radix number, one digit per group in
    /// id order with radix `C(size, count)`; each digit picks the fields of
    /// its group in lexicographic order.
    pub fn combination_exact(&self, rank: &BigUint) -> Result<Vec<T>> {
        if *rank >= self.combinations_exact {
            return Err(invalid(format!(
                "combination rank {rank} out of range, solution has {} combinations",
                self.combinations_exact
            )));
        }
        let mut remaining = rank.clone();
        let mut fields = Vec::new();
        let mut table = BinomialTable::new();
        for (group, &count) in self.groups.iter().zip(&self.values) {
            if count == 0 {
                continue;
            }
            let radix = table.get(group.len(), count);
            let digit = &remaining % &radix;
            remaining /= &radix;
            let picked = specific_combination(
                group.len() as i64,
                count as i64,
                &(BigInt::from(digit) + 1),
            )?;
            fields.extend(picked.into_iter().map(|i| group.fields()[i].clone()));
        }
        Ok(fields)
    }

    /// Picks `count` distinct fields uniformly at random from every group.
    pub fn random_solution<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<T> {
        let mut fields = Vec::new();
        for (group, &count) in self.groups.iter().zip(&self.values) {
            let picked = rand::seq::index::sample(rng, group.len(), count);
            fields.extend(picked.into_iter().map(|i| group.fields()[i].clone()));
        }
        fields
    }
}

impl<T: fmt::Display> fmt::Display for Solution<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (group, count)) in self.groups.iter().zip(&self.values).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{group}={count}")?;
        }
        write!(f, "}} ({} combinations)", self.combinations_exact)
    }
}
