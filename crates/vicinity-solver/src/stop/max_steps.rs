//! Step-count stop criterion.

use vicinity_core::Solution;

use super::StopCriterion;
use crate::state::SearchHandle;

/// Stops a search once its step counter reaches a limit.
///
/// # Example
///
/// ```
/// use vicinity_solver::MaxSteps;
///
/// let limit = MaxSteps::new(1000);
/// ```
#[derive(Debug, Clone)]
pub struct MaxSteps {
    limit: u64,
}

impl MaxSteps {
    /// Creates a step limit.
    ///
    /// # Panics
    ///
    /// Panics if the limit is zero.
    pub fn new(limit: u64) -> Self {
        assert!(limit >= 1, "step limit must be at least 1");
        MaxSteps { limit }
    }

    /// The configured limit.
    pub fn limit(&self) -> u64 {
        self.limit
    }
}

impl<S: Solution> StopCriterion<S> for MaxSteps {
    fn should_stop(&self, search: &SearchHandle<S>) -> bool {
        search.step_count() >= self.limit
    }
}
