//! Exact enumeration of group-count solutions.
//!
//! [`Analyzer`] refines its rules with
//! [`ModelBuilder`](crate::model::ModelBuilder), then runs a backtracking
//! search over the number of active fields per group. Bounds propagation
//! assigns every group whose count is forced, so a large unconstrained
//! remainder (such as the rest of a board under a global count) is never
//! branched on.
//!
//! # References
//!
//! Apt (2003), "Principles of Constraint Programming", ch. 6 (bounds
//! consistency for linear constraints).

mod config;
mod runner;
mod search;

pub use config::SolverConfig;
pub use runner::{solve, Analyzer};
