//! Error types for field probability analysis.

use thiserror::Error;

/// Errors returned by combinatorial decoding and analysis operations.
///
/// Lookups of unknown fields are not errors; they return `None`. An
/// unsatisfiable rule set is not an error either: it produces a result with
/// zero solutions and a total of zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyzeError {
    /// An argument was outside its valid range (rank, size, element count).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation needs at least one solution, but the total is zero.
    #[error("analysis has no solutions")]
    NoSolutions,

    /// The search exceeded the configured step budget.
    #[error("search step budget of {limit} exhausted")]
    BudgetExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// The search was cancelled through its cancellation flag.
    #[error("analysis was cancelled")]
    Cancelled,
}

/// Result alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalyzeError>;

pub(crate) fn invalid(message: impl Into<String>) -> AnalyzeError {
    AnalyzeError::InvalidArgument(message.into())
}
