//! Minimum-improvement stop criterion.

use vicinity_core::Solution;

use super::StopCriterion;
use crate::state::SearchHandle;

/// Stops a search once the magnitude of the most recent best-solution
/// improvement drops below a threshold.
///
/// Cannot fire before the best solution has improved at least once after
/// being established, since no improvement magnitude exists until then.
#[derive(Debug, Clone)]
pub struct MinDelta {
    threshold: f64,
}

impl MinDelta {
    /// Creates a minimum-improvement threshold.
    ///
    /// # Panics
    ///
    /// Panics if the threshold is not a positive finite number.
    pub fn new(threshold: f64) -> Self {
        assert!(
            threshold.is_finite() && threshold > 0.0,
            "minimum delta must be a positive finite number, got {threshold}"
        );
        MinDelta { threshold }
    }
}

impl<S: Solution> StopCriterion<S> for MinDelta {
    fn should_stop(&self, search: &SearchHandle<S>) -> bool {
        search
            .last_improvement_delta()
            .is_some_and(|delta| delta < self.threshold)
    }
}
