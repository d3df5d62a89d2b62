//! Solver configuration.

/// Configuration for [`Analyzer`](super::Analyzer).
///
/// # Examples
///
/// ```
/// use u_fieldprob::solver::SolverConfig;
///
/// let config = SolverConfig::default().with_max_steps(1_000_000);
/// assert_eq!(config.max_steps, 1_000_000);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolverConfig {
    /// Maximum number of search steps (hard budget). 0 = no limit.
    ///
    /// A step is one value tried for one branching group.
    pub max_steps: usize,
}

impl SolverConfig {
    /// Sets the step budget; `0` removes it.
    pub fn with_max_steps(mut self, n: usize) -> Self {
        self.max_steps = n;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_unlimited() {
        assert_eq!(SolverConfig::default().max_steps, 0);
    }

    #[test]
    fn test_with_max_steps() {
        let config = SolverConfig::default().with_max_steps(42);
        assert_eq!(config.max_steps, 42);
    }
}
