//! Stop criteria based on lack of improvement.

use std::time::Duration;

use vicinity_core::Solution;

use super::StopCriterion;
use crate::state::SearchHandle;

/// Stops a search once a number of steps passed without improving the best
/// solution.
#[derive(Debug, Clone)]
pub struct MaxStepsWithoutImprovement {
    limit: u64,
}

impl MaxStepsWithoutImprovement {
    /// Creates an unimproved-step limit.
    ///
    /// # Panics
    ///
    /// Panics if the limit is zero.
    pub fn new(limit: u64) -> Self {
        assert!(limit >= 1, "unimproved step limit must be at least 1");
        MaxStepsWithoutImprovement { limit }
    }
}

impl<S: Solution> StopCriterion<S> for MaxStepsWithoutImprovement {
    fn should_stop(&self, search: &SearchHandle<S>) -> bool {
        search
            .steps_without_improvement()
            .is_some_and(|steps| steps >= self.limit)
    }
}

/// Stops a search once a period passed without improving the best solution.
/// While a run has not found any improvement yet, the period is measured
/// from the run start.
#[derive(Debug, Clone)]
pub struct MaxTimeWithoutImprovement {
    limit: Duration,
}

impl MaxTimeWithoutImprovement {
    /// Creates an unimproved-time limit.
    ///
    /// # Panics
    ///
    /// Panics if the limit is below one millisecond.
    pub fn new(limit: Duration) -> Self {
        assert!(
            limit >= Duration::from_millis(1),
            "unimproved time limit must be at least one millisecond, got {limit:?}"
        );
        MaxTimeWithoutImprovement { limit }
    }

    /// Creates an unimproved-time limit in milliseconds.
    pub fn millis(millis: u64) -> Self {
        MaxTimeWithoutImprovement::new(Duration::from_millis(millis))
    }
}

impl<S: Solution> StopCriterion<S> for MaxTimeWithoutImprovement {
    fn should_stop(&self, search: &SearchHandle<S>) -> bool {
        search
            .time_without_improvement()
            .is_some_and(|time| time >= self.limit)
    }
}
