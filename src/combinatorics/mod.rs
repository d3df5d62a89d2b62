//! Combinatorics over very large assignment spaces.
//!
//! Provides binomial coefficients in two flavours and the ranking functions
//! used to turn a combination number back into a concrete selection:
//!
//! - **Floating point**: [`ncr`], [`nnkk`], [`hypergeometric`]: fast
//!   approximations used for display, heuristics and the detail analysis.
//! - **Exact**: [`ncr_big`], [`BinomialTable`]: arbitrary precision, used
//!   wherever a result must be exact (solution weights, unranking).
//! - **Unranking**: [`index_combinations`] (combinadic order),
//!   [`specific_combination`] (lexicographic order, 1-based) and
//!   [`multi_list_combination`] (mixed-radix over several rules).
//!
//! # References
//!
//! Knuth (2005), "The Art of Computer Programming, Vol. 4A", §7.2.1.3
//! (combinatorial number system).

mod binomial;
mod ranking;

pub use binomial::{hypergeometric, ncr, ncr_big, nnkk, ratio_to_f64, BinomialTable};
pub use ranking::{index_combinations, list_combination, multi_list_combination, specific_combination};
