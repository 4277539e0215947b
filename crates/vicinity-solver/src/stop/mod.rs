//! Stop criteria for searches.
//!
//! Criteria are polled by a background checker thread at a configurable
//! period (see [`Search::set_stop_criterion_check_period`](crate::Search::set_stop_criterion_check_period))
//! and additionally evaluated between steps, so step-count based criteria
//! fire exactly. The first positive result requests a cooperative stop: the
//! in-flight step completes before the search terminates.

mod checker;
mod composite;
mod max_runtime;
mod max_steps;
mod min_delta;
mod target_value;
mod unimproved;

pub use composite::{AndStopCriterion, OrStopCriterion};
pub use max_runtime::MaxRuntime;
pub use max_steps::MaxSteps;
pub use min_delta::MinDelta;
pub use target_value::TargetValue;
pub use unimproved::{MaxStepsWithoutImprovement, MaxTimeWithoutImprovement};

pub(crate) use checker::{StopCriterionChecker, MIN_CHECK_PERIOD};

use std::fmt::Debug;

use vicinity_core::Solution;

use crate::state::SearchHandle;

/// Determines when a search should stop.
///
/// Implementations must be cheap: they are polled concurrently with the
/// running search and evaluated between steps.
pub trait StopCriterion<S: Solution>: Send + Sync + Debug {
    /// Returns `true` if the search should stop.
    fn should_stop(&self, search: &SearchHandle<S>) -> bool;
}
