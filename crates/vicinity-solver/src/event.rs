//! Search event listeners.
//!
//! Listeners receive notifications about search lifecycle events and
//! solution changes. Dispatch is synchronous on the search thread, in
//! registration order; the registration list is snapshotted before every
//! dispatch so an in-flight dispatch is never invalidated.

use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{debug, info, trace};

use vicinity_core::{Evaluation, Solution, Validation};

use crate::state::SearchHandle;

/// Listener for search events.
///
/// All methods default to no-ops, so implementors only override the events
/// they care about. The handed-out references are only valid during the
/// callback; listeners that need to keep a solution clone it.
pub trait SearchListener<S: Solution>: Send + Sync + Debug {
    /// Called when a search run starts.
    fn search_started(&self, _search: &SearchHandle<S>) {}

    /// Called when a search run stops.
    fn search_stopped(&self, _search: &SearchHandle<S>) {}

    /// Called when a new best solution is found.
    fn new_best_solution(
        &self,
        _search: &SearchHandle<S>,
        _solution: &S,
        _evaluation: &dyn Evaluation,
        _validation: &dyn Validation,
    ) {
    }

    /// Called when the current solution is replaced: once when the initial
    /// solution is installed, then once per accepted move.
    fn new_current_solution(
        &self,
        _search: &SearchHandle<S>,
        _solution: &S,
        _evaluation: &dyn Evaluation,
        _validation: &dyn Validation,
    ) {
    }

    /// Called after every completed search step.
    fn step_completed(&self, _search: &SearchHandle<S>, _step: u64) {}
}

/// Fan-out of search events to registered listeners.
pub struct SearchEventSupport<S: Solution> {
    listeners: Vec<Arc<dyn SearchListener<S>>>,
}

impl<S: Solution> SearchEventSupport<S> {
    /// Creates an event support with no listeners.
    pub fn new() -> Self {
        SearchEventSupport {
            listeners: Vec::new(),
        }
    }

    /// Registers a listener. Listeners are notified in registration order.
    pub fn add_listener(&mut self, listener: Arc<dyn SearchListener<S>>) {
        self.listeners.push(listener);
    }

    /// Removes a previously registered listener. Returns `true` if it was
    /// registered.
    pub fn remove_listener(&mut self, listener: &Arc<dyn SearchListener<S>>) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| !Arc::ptr_eq(l, listener));
        self.listeners.len() < before
    }

    /// The number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn snapshot(&self) -> Vec<Arc<dyn SearchListener<S>>> {
        self.listeners.clone()
    }

    pub fn fire_search_started(&self, search: &SearchHandle<S>) {
        for listener in self.snapshot() {
            listener.search_started(search);
        }
    }

    pub fn fire_search_stopped(&self, search: &SearchHandle<S>) {
        for listener in self.snapshot() {
            listener.search_stopped(search);
        }
    }

    pub fn fire_new_best_solution(
        &self,
        search: &SearchHandle<S>,
        solution: &S,
        evaluation: &dyn Evaluation,
        validation: &dyn Validation,
    ) {
        for listener in self.snapshot() {
            listener.new_best_solution(search, solution, evaluation, validation);
        }
    }

    pub fn fire_new_current_solution(
        &self,
        search: &SearchHandle<S>,
        solution: &S,
        evaluation: &dyn Evaluation,
        validation: &dyn Validation,
    ) {
        for listener in self.snapshot() {
            listener.new_current_solution(search, solution, evaluation, validation);
        }
    }

    pub fn fire_step_completed(&self, search: &SearchHandle<S>, step: u64) {
        for listener in self.snapshot() {
            listener.step_completed(search, step);
        }
    }
}

impl<S: Solution> Default for SearchEventSupport<S> {
    fn default() -> Self {
        SearchEventSupport::new()
    }
}

impl<S: Solution> Debug for SearchEventSupport<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEventSupport")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// A listener that logs search events via `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSearchListener;

impl LoggingSearchListener {
    /// Creates a new logging listener.
    pub fn new() -> Self {
        LoggingSearchListener
    }
}

impl<S: Solution> SearchListener<S> for LoggingSearchListener {
    fn search_started(&self, search: &SearchHandle<S>) {
        info!(event = "search_started", search = %search.name());
    }

    fn search_stopped(&self, search: &SearchHandle<S>) {
        info!(
            event = "search_stopped",
            search = %search.name(),
            steps = search.step_count(),
            runtime_ms = search.runtime().map(|r| r.as_millis() as u64),
            best = search.best_value(),
        );
    }

    fn new_best_solution(
        &self,
        search: &SearchHandle<S>,
        _solution: &S,
        evaluation: &dyn Evaluation,
        _validation: &dyn Validation,
    ) {
        debug!(
            event = "new_best_solution",
            search = %search.name(),
            step = search.step_count(),
            value = evaluation.value(),
        );
    }

    fn step_completed(&self, search: &SearchHandle<S>, step: u64) {
        trace!(event = "step_completed", search = %search.name(), step = step);
    }
}

/// A listener that counts event occurrences. Useful for tests and
/// statistics collection.
#[derive(Debug, Default)]
pub struct CountingSearchListener {
    started: AtomicUsize,
    stopped: AtomicUsize,
    best_solutions: AtomicUsize,
    current_solutions: AtomicUsize,
    steps: AtomicUsize,
}

impl CountingSearchListener {
    /// Creates a new counting listener.
    pub fn new() -> Self {
        CountingSearchListener::default()
    }

    /// The number of `search_started` events seen.
    pub fn started_count(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// The number of `search_stopped` events seen.
    pub fn stopped_count(&self) -> usize {
        self.stopped.load(Ordering::SeqCst)
    }

    /// The number of `new_best_solution` events seen.
    pub fn best_solution_count(&self) -> usize {
        self.best_solutions.load(Ordering::SeqCst)
    }

    /// The number of `new_current_solution` events seen.
    pub fn current_solution_count(&self) -> usize {
        self.current_solutions.load(Ordering::SeqCst)
    }

    /// The number of `step_completed` events seen.
    pub fn step_count(&self) -> usize {
        self.steps.load(Ordering::SeqCst)
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        self.started.store(0, Ordering::SeqCst);
        self.stopped.store(0, Ordering::SeqCst);
        self.best_solutions.store(0, Ordering::SeqCst);
        self.current_solutions.store(0, Ordering::SeqCst);
        self.steps.store(0, Ordering::SeqCst);
    }
}

impl<S: Solution> SearchListener<S> for CountingSearchListener {
    fn search_started(&self, _search: &SearchHandle<S>) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn search_stopped(&self, _search: &SearchHandle<S>) {
        self.stopped.fetch_add(1, Ordering::SeqCst);
    }

    fn new_best_solution(
        &self,
        _search: &SearchHandle<S>,
        _solution: &S,
        _evaluation: &dyn Evaluation,
        _validation: &dyn Validation,
    ) {
        self.best_solutions.fetch_add(1, Ordering::SeqCst);
    }

    fn new_current_solution(
        &self,
        _search: &SearchHandle<S>,
        _solution: &S,
        _evaluation: &dyn Evaluation,
        _validation: &dyn Validation,
    ) {
        self.current_solutions.fetch_add(1, Ordering::SeqCst);
    }

    fn step_completed(&self, _search: &SearchHandle<S>, _step: u64) {
        self.steps.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SharedSearchState;

    fn handle() -> SearchHandle<i64> {
        SearchHandle::new(Arc::new(SharedSearchState::new("test".into(), false)))
    }

    #[test]
    fn test_listeners_fire_in_registration_order() {
        #[derive(Debug)]
        struct Recorder {
            id: usize,
            log: Arc<parking_lot::Mutex<Vec<usize>>>,
        }

        impl SearchListener<i64> for Recorder {
            fn search_started(&self, _search: &SearchHandle<i64>) {
                self.log.lock().push(self.id);
            }
        }

        let log = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let mut support = SearchEventSupport::new();
        for id in 0..3 {
            support.add_listener(Arc::new(Recorder {
                id,
                log: Arc::clone(&log),
            }));
        }
        support.fire_search_started(&handle());
        assert_eq!(*log.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn test_counting_listener() {
        let listener = Arc::new(CountingSearchListener::new());
        let mut support = SearchEventSupport::new();
        let listener_handle: Arc<dyn SearchListener<i64>> = listener.clone();
        support.add_listener(listener_handle);

        let handle = handle();
        support.fire_search_started(&handle);
        support.fire_step_completed(&handle, 1);
        support.fire_step_completed(&handle, 2);
        support.fire_search_stopped(&handle);

        assert_eq!(listener.started_count(), 1);
        assert_eq!(listener.step_count(), 2);
        assert_eq!(listener.stopped_count(), 1);
    }

    #[test]
    fn test_remove_listener() {
        let listener: Arc<dyn SearchListener<i64>> = Arc::new(CountingSearchListener::new());
        let mut support = SearchEventSupport::new();
        support.add_listener(Arc::clone(&listener));
        assert_eq!(support.listener_count(), 1);
        assert!(support.remove_listener(&listener));
        assert!(!support.remove_listener(&listener));
        assert_eq!(support.listener_count(), 0);
    }
}
