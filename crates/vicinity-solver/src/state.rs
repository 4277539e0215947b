//! Shared search state and the thread-safe search handle.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

use vicinity_core::{Evaluation, Solution, Validation};

use crate::status::SearchStatus;

/// The best solution found so far, together with its evaluation and
/// validation.
#[derive(Debug, Clone)]
pub struct BestSolution<S: Solution> {
    /// The best solution.
    pub solution: S,
    /// Its evaluation.
    pub evaluation: Box<dyn Evaluation>,
    /// Its validation. Always passed: invalid solutions never become best.
    pub validation: Box<dyn Validation>,
}

#[derive(Debug, Default)]
struct Timing {
    started: Option<Instant>,
    stopped: Option<Instant>,
    last_improvement: Option<Instant>,
    steps_at_last_improvement: u64,
    last_improvement_delta: Option<f64>,
}

/// State shared between a search, its handles, its listeners and the
/// stop-criterion checker thread.
///
/// Counters are atomics; compound state sits behind short critical
/// sections so that readers on other threads always observe a consistent
/// snapshot.
#[derive(Debug)]
pub(crate) struct SharedSearchState<S: Solution> {
    name: String,
    minimizing: AtomicBool,
    status: Mutex<SearchStatus>,
    stop_requested: AtomicBool,
    steps: AtomicU64,
    accepted_moves: AtomicU64,
    rejected_moves: AtomicU64,
    timing: Mutex<Timing>,
    best: Mutex<Option<BestSolution<S>>>,
}

impl<S: Solution> SharedSearchState<S> {
    pub(crate) fn new(name: String, minimizing: bool) -> Self {
        SharedSearchState {
            name,
            minimizing: AtomicBool::new(minimizing),
            status: Mutex::new(SearchStatus::Idle),
            stop_requested: AtomicBool::new(false),
            steps: AtomicU64::new(0),
            accepted_moves: AtomicU64::new(0),
            rejected_moves: AtomicU64::new(0),
            timing: Mutex::new(Timing::default()),
            best: Mutex::new(None),
        }
    }

    pub(crate) fn status(&self) -> SearchStatus {
        *self.status.lock()
    }

    pub(crate) fn set_status(&self, status: SearchStatus) {
        *self.status.lock() = status;
    }

    /// Resets the per-run counters and timestamps. The best solution is
    /// deliberately preserved across runs.
    pub(crate) fn begin_run(&self, minimizing: bool) {
        self.minimizing.store(minimizing, Ordering::SeqCst);
        self.stop_requested.store(false, Ordering::SeqCst);
        self.steps.store(0, Ordering::SeqCst);
        self.accepted_moves.store(0, Ordering::SeqCst);
        self.rejected_moves.store(0, Ordering::SeqCst);
        *self.timing.lock() = Timing {
            started: Some(Instant::now()),
            ..Timing::default()
        };
    }

    pub(crate) fn end_run(&self) {
        self.timing.lock().stopped = Some(Instant::now());
    }

    pub(crate) fn request_stop(&self) {
        let mut status = self.status.lock();
        match *status {
            SearchStatus::Initializing | SearchStatus::Running => {
                self.stop_requested.store(true, Ordering::SeqCst);
                if *status == SearchStatus::Running {
                    *status = SearchStatus::Terminating;
                }
            }
            // idempotent; no effect once idle, terminating or disposed
            _ => {}
        }
    }

    pub(crate) fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    pub(crate) fn record_step(&self) -> u64 {
        self.steps.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn record_accepted_move(&self) {
        self.accepted_moves.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_rejected_move(&self) {
        self.rejected_moves.fetch_add(1, Ordering::SeqCst);
    }

    /// Records a best-solution improvement of the given magnitude.
    pub(crate) fn record_improvement(&self, delta: Option<f64>) {
        let mut timing = self.timing.lock();
        timing.last_improvement = Some(Instant::now());
        timing.steps_at_last_improvement = self.steps.load(Ordering::SeqCst);
        if delta.is_some() {
            timing.last_improvement_delta = delta;
        }
    }

    pub(crate) fn set_best(&self, best: BestSolution<S>) {
        *self.best.lock() = Some(best);
    }
}

/// A cloneable, thread-safe view of a search.
///
/// Handles are passed to listeners and stop criteria, and can be kept by
/// any thread to observe metrics or request a stop while the search runs.
/// All accessors return consistent snapshots; solutions are handed out by
/// clone.
#[derive(Debug)]
pub struct SearchHandle<S: Solution> {
    state: Arc<SharedSearchState<S>>,
}

impl<S: Solution> Clone for SearchHandle<S> {
    fn clone(&self) -> Self {
        SearchHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: Solution> SearchHandle<S> {
    pub(crate) fn new(state: Arc<SharedSearchState<S>>) -> Self {
        SearchHandle { state }
    }

    /// The search name.
    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// The current lifecycle status.
    pub fn status(&self) -> SearchStatus {
        self.state.status()
    }

    /// Whether the search minimizes its evaluations.
    pub fn is_minimizing(&self) -> bool {
        self.state.minimizing.load(Ordering::SeqCst)
    }

    /// The runtime of the current run, or the final runtime of the last
    /// run. `None` if the search never ran.
    pub fn runtime(&self) -> Option<Duration> {
        let timing = self.state.timing.lock();
        timing
            .started
            .map(|started| timing.stopped.unwrap_or_else(Instant::now) - started)
    }

    /// The number of completed steps in the current (or last) run.
    pub fn step_count(&self) -> u64 {
        self.state.steps.load(Ordering::SeqCst)
    }

    /// The number of accepted moves in the current (or last) run.
    pub fn accepted_move_count(&self) -> u64 {
        self.state.accepted_moves.load(Ordering::SeqCst)
    }

    /// The number of rejected moves in the current (or last) run.
    pub fn rejected_move_count(&self) -> u64 {
        self.state.rejected_moves.load(Ordering::SeqCst)
    }

    /// Time since the last best-solution improvement, measured from the run
    /// start if the run has not improved the best yet. `None` if the search
    /// never ran.
    pub fn time_without_improvement(&self) -> Option<Duration> {
        let timing = self.state.timing.lock();
        let reference = timing.last_improvement.or(timing.started)?;
        let end = timing.stopped.unwrap_or_else(Instant::now);
        Some(end.checked_duration_since(reference).unwrap_or_default())
    }

    /// Steps since the last best-solution improvement. `None` if the search
    /// never ran.
    pub fn steps_without_improvement(&self) -> Option<u64> {
        let timing = self.state.timing.lock();
        timing.started?;
        Some(self.step_count() - timing.steps_at_last_improvement)
    }

    /// The magnitude of the most recent best-solution improvement. `None`
    /// until the best solution has improved at least once after being
    /// established.
    pub fn last_improvement_delta(&self) -> Option<f64> {
        self.state.timing.lock().last_improvement_delta
    }

    /// A clone of the best solution found so far, if any valid solution has
    /// been visited.
    pub fn best_solution(&self) -> Option<S> {
        self.state.best.lock().as_ref().map(|b| b.solution.clone())
    }

    /// The value of the best evaluation so far.
    pub fn best_value(&self) -> Option<f64> {
        self.state.best.lock().as_ref().map(|b| b.evaluation.value())
    }

    /// A clone of the full best-solution record.
    pub fn best(&self) -> Option<BestSolution<S>> {
        self.state.best.lock().clone()
    }

    /// Requests the search to stop. Safe from any thread and idempotent;
    /// has no effect while the search is idle. The in-flight step completes
    /// before the search terminates.
    pub fn stop(&self) {
        debug!(event = "stop_requested", search = %self.name());
        self.state.request_stop();
    }

    /// Whether a stop has been requested for the current run.
    pub fn is_stop_requested(&self) -> bool {
        self.state.is_stop_requested()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vicinity_core::SimpleEvaluation;
    use vicinity_core::SimpleValidation;

    fn state() -> Arc<SharedSearchState<i64>> {
        Arc::new(SharedSearchState::new("test".into(), false))
    }

    #[test]
    fn test_handle_before_any_run() {
        let handle = SearchHandle::new(state());
        assert_eq!(handle.status(), SearchStatus::Idle);
        assert!(handle.runtime().is_none());
        assert!(handle.time_without_improvement().is_none());
        assert!(handle.steps_without_improvement().is_none());
        assert!(handle.best_solution().is_none());
    }

    #[test]
    fn test_counters_reset_per_run_but_best_is_kept() {
        let state = state();
        let handle = SearchHandle::new(Arc::clone(&state));

        state.begin_run(false);
        state.record_step();
        state.record_accepted_move();
        state.set_best(BestSolution {
            solution: 5,
            evaluation: Box::new(SimpleEvaluation::of(5.0)),
            validation: Box::new(SimpleValidation::PASSED),
        });
        state.end_run();

        state.begin_run(false);
        assert_eq!(handle.step_count(), 0);
        assert_eq!(handle.accepted_move_count(), 0);
        assert_eq!(handle.best_solution(), Some(5));
    }

    #[test]
    fn test_stop_has_no_effect_when_idle() {
        let state = state();
        let handle = SearchHandle::new(Arc::clone(&state));
        handle.stop();
        assert!(!handle.is_stop_requested());
        assert_eq!(handle.status(), SearchStatus::Idle);
    }

    #[test]
    fn test_stop_while_running_enters_terminating() {
        let state = state();
        let handle = SearchHandle::new(Arc::clone(&state));
        state.begin_run(false);
        state.set_status(SearchStatus::Running);
        handle.stop();
        handle.stop();
        assert!(handle.is_stop_requested());
        assert_eq!(handle.status(), SearchStatus::Terminating);
    }

    #[test]
    fn test_improvement_tracking() {
        let state = state();
        let handle = SearchHandle::new(Arc::clone(&state));
        state.begin_run(false);
        state.record_step();
        state.record_step();
        assert_eq!(handle.steps_without_improvement(), Some(2));

        state.record_improvement(Some(1.5));
        assert_eq!(handle.steps_without_improvement(), Some(0));
        assert_eq!(handle.last_improvement_delta(), Some(1.5));

        state.record_step();
        assert_eq!(handle.steps_without_improvement(), Some(1));
    }
}
