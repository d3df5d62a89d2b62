//! Analysis entry points.

use super::config::SolverConfig;
use super::search::Search;
use crate::analysis::AnalyzeResult;
use crate::error::Result;
use crate::model::{FieldRule, ModelBuilder};
use std::hash::Hash;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

/// Collects rules and solves them.
///
/// # Examples
///
/// ```
/// use u_fieldprob::{Analyzer, FieldRule, SolverConfig};
///
/// let mut analyzer = Analyzer::with_config(SolverConfig::default().with_max_steps(10_000));
/// analyzer
///     .add_rule(FieldRule::new(vec![1, 2, 3], 1))
///     .add_rule(FieldRule::new(vec![3, 4], 1));
/// let result = analyzer.solve().unwrap();
/// assert_eq!(result.total(), 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct Analyzer<T> {
    rules: Vec<FieldRule<T>>,
    config: SolverConfig,
}

impl<T> Default for Analyzer<T> {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            config: SolverConfig::default(),
        }
    }
}

impl<T: Clone + Eq + Hash> Analyzer<T> {
    /// Creates an analyzer with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an analyzer with `config`.
    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            rules: Vec::new(),
            config,
        }
    }

    /// Adds one rule.
    pub fn add_rule(&mut self, rule: FieldRule<T>) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Adds every rule of `rules`.
    pub fn add_rules<I: IntoIterator<Item = FieldRule<T>>>(&mut self, rules: I) -> &mut Self {
        self.rules.extend(rules);
        self
    }

    /// Rules added so far.
    pub fn rules(&self) -> &[FieldRule<T>] {
        &self.rules
    }

    /// The configuration used for solving.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Refines the rules and enumerates every solution.
    ///
    /// An unsatisfiable rule set is not an error: the result has no
    /// solutions and a total of zero.
    ///
    /// # Errors
    ///
    /// `BudgetExceeded` when the search takes more than
    /// [`SolverConfig::max_steps`] steps.
    pub fn solve(&self) -> Result<AnalyzeResult<T>> {
        self.solve_with_cancel(None)
    }

    /// Runs [`solve`](Self::solve) with an optional cancellation token.
    ///
    /// The flag is polled once per search step; when it is set the search
    /// stops with `Cancelled`.
    pub fn solve_with_cancel(&self, cancel: Option<Arc<AtomicBool>>) -> Result<AnalyzeResult<T>> {
        let mut builder = ModelBuilder::new();
        for rule in &self.rules {
            builder.add_rule(rule);
        }
        let model = builder.build();
        info!(
            event = "solve_start",
            rules = model.rules().len(),
            groups = model.groups().len(),
        );

        let outcome = Search::new(&model, &self.config, cancel.as_deref()).run()?;
        let result = AnalyzeResult::new(
            self.rules.clone(),
            model,
            outcome.assignments,
            self.config.clone(),
        );
        info!(
            event = "solve_end",
            solutions = result.solutions().len(),
            steps = outcome.steps,
            total = %result.total_exact(),
        );
        Ok(result)
    }
}

/// Solves `rules` with the default configuration.
pub fn solve<T, I>(rules: I) -> Result<AnalyzeResult<T>>
where
    T: Clone + Eq + Hash,
    I: IntoIterator<Item = FieldRule<T>>,
{
    let mut analyzer = Analyzer::new();
    analyzer.add_rules(rules);
    analyzer.solve()
}
