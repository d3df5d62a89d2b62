//! The outcome of an analysis and the queries it answers.

use super::Solution;
use crate::combinatorics::{ratio_to_f64, BinomialTable};
use crate::error::{invalid, AnalyzeError, Result};
use crate::model::{FieldGroup, FieldRule, GroupId, RefinedModel, RefinedRule};
use crate::solver::{Analyzer, SolverConfig};
use num_bigint::BigUint;
use num_traits::{FromPrimitive, ToPrimitive, Zero};
use rand::Rng;
use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;
use std::sync::Arc;
use tracing::debug;

/// Per-group figures derived from all solutions.
#[derive(Debug, Clone, Copy, PartialEq)]
struct GroupStats {
    probability: f64,
    solutions_known: usize,
}

/// Every solution of a rule set, with per-group probabilities.
///
/// Produced by [`Analyzer::solve`] or [`solve`](crate::solve). Immutable;
/// queries that add rules solve a new, smaller analysis.
///
/// # Examples
///
/// ```
/// use u_fieldprob::{solve, FieldRule};
///
/// let result = solve(vec![
///     FieldRule::new(vec!['a', 'b', 'c'], 2),
///     FieldRule::new(vec!['b', 'c', 'd', 'e'], 2),
/// ])
/// .unwrap();
///
/// assert_eq!(result.solutions().len(), 2);
/// assert_eq!(result.total(), 5.0);
/// let a = result.group_for(&'a').unwrap();
/// assert!((result.group_probability(a) - 0.8).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct AnalyzeResult<T> {
    original_rules: Vec<FieldRule<T>>,
    rules: Vec<RefinedRule>,
    groups: Arc<[FieldGroup<T>]>,
    solutions: Vec<Solution<T>>,
    total_exact: BigUint,
    total: f64,
    stats: Vec<GroupStats>,
    field_index: HashMap<T, GroupId>,
    config: SolverConfig,
}

impl<T: Clone + Eq + Hash> AnalyzeResult<T> {
    pub(crate) fn new(
        original_rules: Vec<FieldRule<T>>,
        model: RefinedModel<T>,
        assignments: Vec<Vec<usize>>,
        config: SolverConfig,
    ) -> Self {
        let (groups, rules) = model.into_parts();
        let groups: Arc<[FieldGroup<T>]> = groups.into();

        let mut table = BinomialTable::new();
        let mut solutions: Vec<Solution<T>> = assignments
            .into_iter()
            .map(|values| Solution::new(Arc::clone(&groups), values, &mut table))
            .collect();
        let total_exact: BigUint = solutions.iter().map(|s| s.combinations_exact()).sum();
        for solution in &mut solutions {
            solution.set_total(&total_exact);
        }

        let stats = (0..groups.len())
            .map(|g| {
                let size = groups[g].len();
                let mut active = BigUint::zero();
                let mut solutions_known = 0;
                for solution in &solutions {
                    let count = solution.values()[g];
                    if count > 0 {
                        active += solution.combinations_exact() * count;
                        solutions_known += 1;
                    }
                }
                let probability = if total_exact.is_zero() || active.is_zero() {
                    0.0
                } else {
                    ratio_to_f64(&active, &(&total_exact * size))
                };
                GroupStats {
                    probability,
                    solutions_known,
                }
            })
            .collect();

        let mut field_index = HashMap::new();
        for (g, group) in groups.iter().enumerate() {
            for field in group {
                field_index.entry(field.clone()).or_insert(GroupId(g));
            }
        }

        Self {
            original_rules,
            rules,
            groups,
            solutions,
            total: total_exact.to_f64().unwrap_or(f64::INFINITY),
            total_exact,
            stats,
            field_index,
            config,
        }
    }

    /// The rules as they were given.
    pub fn original_rules(&self) -> &[FieldRule<T>] {
        &self.original_rules
    }

    /// The refined rules over [`groups`](Self::groups).
    pub fn rules(&self) -> &[RefinedRule] {
        &self.rules
    }

    /// The refined groups, indexed by [`GroupId::index`].
    pub fn groups(&self) -> &[FieldGroup<T>] {
        &self.groups
    }

    /// The group with id `id`.
    pub fn group(&self, id: GroupId) -> &FieldGroup<T> {
        &self.groups[id.index()]
    }

    /// Every solution, in search order.
    pub fn solutions(&self) -> &[Solution<T>] {
        &self.solutions
    }

    /// Number of concrete assignments over all solutions, as `f64`.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Exact number of concrete assignments over all solutions.
    pub fn total_exact(&self) -> &BigUint {
        &self.total_exact
    }

    /// Group holding `field`, `None` for fields in no rule.
    pub fn group_for(&self, field: &T) -> Option<GroupId> {
        self.field_index.get(field).copied()
    }

    /// Probability that any single field of `group` is active.
    ///
    /// Exactly `0.0` or `1.0` for groups with the same ratio in every
    /// solution, and `0.0` when there are no solutions.
    pub fn group_probability(&self, group: GroupId) -> f64 {
        self.stats[group.index()].probability
    }

    /// Probability that `field` is active, `None` for unknown fields.
    pub fn field_probability(&self, field: &T) -> Option<f64> {
        self.group_for(field).map(|g| self.group_probability(g))
    }

    /// Number of solutions in which `group` has at least one active field.
    pub fn solutions_known(&self, group: GroupId) -> usize {
        self.stats[group.index()].solutions_known
    }

    /// Every field of every group, in group order.
    pub fn fields(&self) -> Vec<T> {
        self.groups
            .iter()
            .flat_map(|g| g.iter().cloned())
            .collect()
    }

    /// Number of assignments that also satisfy `extra_rules`.
    ///
    /// For every solution, the groups touched by the extra rules are pinned
    /// to their counts and solved together with the extra rules; untouched
    /// groups contribute `C(size, count)` unchanged. Sub-totals are cached
    /// by the pinned counts, so solutions that agree on the touched groups
    /// are solved once.
    ///
    /// # Errors
    ///
    /// `NoSolutions` when this analysis has none; solver errors from the
    /// sub-analyses.
    pub fn total_with(&self, extra_rules: &[FieldRule<T>]) -> Result<BigUint> {
        if self.total_exact.is_zero() {
            return Err(AnalyzeError::NoSolutions);
        }
        let touched: BTreeSet<GroupId> = extra_rules
            .iter()
            .flat_map(|rule| rule.fields())
            .filter_map(|field| self.group_for(field))
            .collect();

        let mut table = BinomialTable::new();
        let mut cache: HashMap<Vec<usize>, BigUint> = HashMap::new();
        let mut sum = BigUint::zero();
        for solution in &self.solutions {
            let key: Vec<usize> = touched.iter().map(|&g| solution.value(g)).collect();
            let sub_total = match cache.get(&key) {
                Some(total) => total.clone(),
                None => {
                    let total = self.pinned_total(&touched, &key, extra_rules)?;
                    cache.insert(key, total.clone());
                    total
                }
            };
            if sub_total.is_zero() {
                continue;
            }
            let mut weight = sub_total;
            for (g, group) in self.groups.iter().enumerate() {
                if !touched.contains(&GroupId(g)) {
                    weight *= table.get(group.len(), solution.values()[g]);
                }
            }
            sum += weight;
        }
        debug!(
            event = "total_with",
            extra_rules = extra_rules.len(),
            touched = touched.len(),
            sub_analyses = cache.len(),
        );
        Ok(sum)
    }

    fn pinned_total(
        &self,
        touched: &BTreeSet<GroupId>,
        counts: &[usize],
        extra_rules: &[FieldRule<T>],
    ) -> Result<BigUint> {
        let mut analyzer = Analyzer::with_config(self.config.clone());
        for (&g, &count) in touched.iter().zip(counts) {
            analyzer.add_rule(FieldRule::new(self.group(g).fields().to_vec(), count));
        }
        for rule in extra_rules {
            analyzer.add_rule(rule.clone());
        }
        Ok(analyzer.solve()?.total_exact)
    }

    /// Probability that `extra_rules` also hold.
    ///
    /// # Errors
    ///
    /// See [`total_with`](Self::total_with).
    pub fn probability_of(&self, extra_rules: &[FieldRule<T>]) -> Result<f64> {
        let with = self.total_with(extra_rules)?;
        Ok(ratio_to_f64(&with, &self.total_exact))
    }

    /// Solves the original rules together with `extra_rules` from scratch.
    pub fn with_extra_rules(&self, extra_rules: &[FieldRule<T>]) -> Result<AnalyzeResult<T>> {
        let mut analyzer = Analyzer::with_config(self.config.clone());
        for rule in self.original_rules.iter().chain(extra_rules) {
            analyzer.add_rule(rule.clone());
        }
        analyzer.solve()
    }

    /// Active fields of the `rank`-th assignment over all solutions.
    ///
    /// # Errors
    ///
    /// `NoSolutions` when there are none, `InvalidArgument` unless `rank` is
    /// an integer in `[0, total)`.
    pub fn solution_at(&self, rank: f64) -> Result<Vec<T>> {
        if self.total_exact.is_zero() {
            return Err(AnalyzeError::NoSolutions);
        }
        if rank.fract() != 0.0 || rank < 0.0 {
            return Err(invalid(format!(
                "solution rank must be a non-negative integer, was {rank}"
            )));
        }
        let mut remaining = BigUint::from_f64(rank)
            .ok_or_else(|| invalid(format!("solution rank {rank} is not finite")))?;
        if remaining >= self.total_exact {
            return Err(invalid(format!(
                "solution rank {rank} out of range, total is {}",
                self.total_exact
            )));
        }
        for solution in &self.solutions {
            if remaining < *solution.combinations_exact() {
                return solution.combination_exact(&remaining);
            }
            remaining -= solution.combinations_exact();
        }
        Err(invalid(format!("solution rank {rank} out of range")))
    }

    /// A uniformly random assignment over all solutions.
    ///
    /// A solution is chosen by its exact share of the total, then each of
    /// its groups picks its active fields uniformly.
    pub fn random_solution<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<T>> {
        let last = self
            .solutions
            .iter()
            .rev()
            .find(|s| !s.combinations_exact().is_zero())
            .filter(|_| !self.total_exact.is_zero())
            .ok_or(AnalyzeError::NoSolutions)?;
        // shares are finite even when the total is not; `last` absorbs rounding
        let mut remaining = rng.random::<f64>();
        for solution in &self.solutions {
            if remaining < solution.probability() {
                return Ok(solution.random_solution(rng));
            }
            remaining -= solution.probability();
        }
        Ok(last.random_solution(rng))
    }
}
