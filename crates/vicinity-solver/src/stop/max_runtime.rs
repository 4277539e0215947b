//! Runtime-based stop criterion.

use std::time::Duration;

use vicinity_core::Solution;

use super::StopCriterion;
use crate::state::SearchHandle;

/// Stops a search once its runtime reaches a limit.
///
/// Termination may lag behind the limit by up to one polling period plus
/// the duration of the in-flight step.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use vicinity_solver::MaxRuntime;
///
/// let limit = MaxRuntime::new(Duration::from_secs(30));
/// let limit = MaxRuntime::seconds(30);
/// let limit = MaxRuntime::millis(2345);
/// ```
#[derive(Debug, Clone)]
pub struct MaxRuntime {
    limit: Duration,
}

impl MaxRuntime {
    /// Creates a runtime limit.
    ///
    /// # Panics
    ///
    /// Panics if the limit is below one millisecond.
    pub fn new(limit: Duration) -> Self {
        assert!(
            limit >= Duration::from_millis(1),
            "runtime limit must be at least one millisecond, got {limit:?}"
        );
        MaxRuntime { limit }
    }

    /// Creates a runtime limit in milliseconds.
    pub fn millis(millis: u64) -> Self {
        MaxRuntime::new(Duration::from_millis(millis))
    }

    /// Creates a runtime limit in seconds.
    pub fn seconds(seconds: u64) -> Self {
        MaxRuntime::new(Duration::from_secs(seconds))
    }

    /// The configured limit.
    pub fn limit(&self) -> Duration {
        self.limit
    }
}

impl<S: Solution> StopCriterion<S> for MaxRuntime {
    fn should_stop(&self, search: &SearchHandle<S>) -> bool {
        search.runtime().is_some_and(|runtime| runtime >= self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "at least one millisecond")]
    fn test_sub_millisecond_limit_panics() {
        MaxRuntime::new(Duration::from_micros(500));
    }

    #[test]
    fn test_constructors() {
        assert_eq!(MaxRuntime::millis(2345).limit(), Duration::from_millis(2345));
        assert_eq!(MaxRuntime::seconds(2).limit(), Duration::from_secs(2));
    }
}
