//! Neighbour-count distributions per field.
//!
//! Given a neighbourhood relation ([`NeighborFind`]), the detail analysis
//! answers "if this field is inactive, how likely is each number of active
//! neighbours?" for every field of an [`AnalyzeResult`](crate::AnalyzeResult).
//! This is the distribution of the clue a field would reveal.
//!
//! With the `parallel` feature the distinct distributions are computed on
//! the rayon thread pool.

mod analyze;
mod proxy;

pub use proxy::{DetailedResults, FieldProxy, NeighborFind};
