//! Domain-agnostic exact probability analysis for sum constraints.
//!
//! Describe a problem as rules of the form "exactly `n` of these fields are
//! active" over shared unknowns, and this crate computes every globally
//! consistent solution and the exact probability that each field is active:
//!
//! - **Model**: [`FieldRule`]s are refined by [`model::ModelBuilder`] into
//!   interchangeable [`FieldGroup`]s, so the search reasons about counts per
//!   group instead of individual fields.
//! - **Solver**: [`Analyzer`] enumerates group counts with bounds
//!   propagation, with an optional step budget and cancellation flag.
//! - **Analysis**: [`AnalyzeResult`] and [`Solution`] carry exact weights
//!   and totals, per-field probabilities, conditional queries
//!   ([`AnalyzeResult::probability_of`]), ranking and random sampling.
//! - **Detail**: [`AnalyzeResult::analyze_detailed`] derives, for every
//!   field, the distribution of its number of active neighbours.
//! - **Combinatorics**: exact and floating-point binomials, and unranking of
//!   combinations over spaces far beyond 64 bits.
//!
//! # Example
//!
//! ```
//! use u_fieldprob::{solve, FieldRule};
//!
//! // a + b + c = 2 and b + c + d + e = 2
//! let result = solve(vec![
//!     FieldRule::new(vec!['a', 'b', 'c'], 2),
//!     FieldRule::new(vec!['b', 'c', 'd', 'e'], 2),
//! ])
//! .unwrap();
//!
//! assert_eq!(result.groups().len(), 3);
//! assert_eq!(result.total(), 5.0);
//! let p = result.field_probability(&'d').unwrap();
//! assert!((p - 0.4).abs() < 1e-12);
//! ```
//!
//! # Architecture
//!
//! The engine knows nothing about grids, games or clues; adapters that turn
//! a board into rules live with their consumers.

pub mod analysis;
pub mod combinatorics;
pub mod detail;
pub mod error;
pub mod model;
pub mod solver;

#[cfg(test)]
pub(crate) mod test_utils;

pub use analysis::{AnalyzeResult, Solution};
pub use detail::{DetailedResults, FieldProxy, NeighborFind};
pub use error::{AnalyzeError, Result};
pub use model::{FieldGroup, FieldRule, GroupId};
pub use solver::{solve, Analyzer, SolverConfig};
