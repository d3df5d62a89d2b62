//! Analysis results: solutions, totals and probabilities.
//!
//! An [`AnalyzeResult`] holds every [`Solution`] of a rule set. Each
//! solution fixes how many fields of every group are active and weighs
//! `Π C(size, count)` concrete assignments; the total over all solutions is
//! the number of assignments satisfying every rule. Weights and totals are
//! exact ([`BigUint`](num_bigint::BigUint)); `f64` views are provided for
//! convenience.

mod result;
mod solution;

pub use result::AnalyzeResult;
pub use solution::Solution;
