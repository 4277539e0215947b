//! The search driver: lifecycle state machine and strategy seam.

mod context;

pub use context::{CurrentSolution, MoveOutcome, SearchContext};

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use vicinity_core::{Evaluation, Problem, Result, Validation, VicinityError};

use crate::config::SearchConfig;
use crate::event::SearchListener;
use crate::state::{BestSolution, SearchHandle};
use crate::status::SearchStatus;
use crate::stop::{StopCriterion, StopCriterionChecker, MIN_CHECK_PERIOD};

/// Default stop-criterion polling period.
const DEFAULT_CHECK_PERIOD: Duration = Duration::from_secs(1);

/// The step function of a search algorithm.
///
/// A strategy holds algorithm state (neighborhoods, indices) and advances
/// the search one step at a time against the [`SearchContext`]. The driver
/// calls [`step`](SearchStrategy::step) until a stop condition fires; a
/// strategy that has converged requests termination with
/// [`SearchContext::stop`].
pub trait SearchStrategy<P: Problem>: Send + Debug {
    /// The default search name for this strategy.
    fn name(&self) -> &str;

    /// Resets per-run algorithm state. Called at the start of every run.
    fn restart(&mut self) {}

    /// Executes one search step.
    fn step(&mut self, ctx: &mut SearchContext<P>) -> Result<()>;
}

/// An object-safe facade over a runnable search, used to embed local
/// searches inside meta-searches such as
/// [`VariableNeighborhoodSearch`](crate::VariableNeighborhoodSearch).
///
/// Every [`Search`] implements this trait.
pub trait LocalSearch<P: Problem>: Send {
    /// Reseeds the search's source of randomness.
    fn set_seed(&mut self, seed: u64);

    /// Installs the solution the next run starts from.
    fn set_initial_solution(&mut self, solution: P::Solution);

    /// Runs the search until it terminates.
    fn run(&mut self) -> Result<()>;

    /// The best solution found so far, with its evaluation and validation.
    fn best(&self) -> Option<BestSolution<P::Solution>>;
}

/// A metaheuristic search: a [`SearchStrategy`] driven through the shared
/// lifecycle state machine.
///
/// # Lifecycle
///
/// [`start`](Search::start) is legal only while idle. It initializes the
/// run (seeding the current solution from the preserved best, or from a
/// random solution on the first run), fires `search_started`, then invokes
/// the strategy's step function until a stop condition signals. Stops are
/// cooperative: [`stop`](Search::stop), whether called from another
/// thread, a listener or a stop criterion, lets the in-flight step
/// complete, after which
/// `search_stopped` fires and the search returns to idle.
///
/// Subsequent runs reset the per-run counters but keep the best solution,
/// which seeds the next run.
pub struct Search<P: Problem, A: SearchStrategy<P>> {
    context: SearchContext<P>,
    strategy: A,
    stop_criteria: Vec<Arc<dyn StopCriterion<P::Solution>>>,
    check_period: Duration,
}

impl<P: Problem, A: SearchStrategy<P>> Search<P, A> {
    /// Creates a search over the given problem, named after the strategy.
    pub fn new(problem: impl Into<Arc<P>>, strategy: A) -> Self {
        let name = strategy.name().to_owned();
        Search::with_name(name, problem, strategy)
    }

    /// Creates a search with a custom name.
    pub fn with_name(name: impl Into<String>, problem: impl Into<Arc<P>>, strategy: A) -> Self {
        Search {
            context: SearchContext::new(problem.into(), name.into()),
            strategy,
            stop_criteria: Vec::new(),
            check_period: DEFAULT_CHECK_PERIOD,
        }
    }

    /// The search name.
    pub fn name(&self) -> &str {
        self.context.handle().name()
    }

    /// The current lifecycle status.
    pub fn status(&self) -> SearchStatus {
        self.context.handle().status()
    }

    /// A thread-safe handle to observe this search and request stops.
    pub fn handle(&self) -> SearchHandle<P::Solution> {
        self.context.handle().clone()
    }

    /// The problem being solved.
    pub fn problem(&self) -> &Arc<P> {
        self.context.problem()
    }

    /// Reseeds the per-search source of randomness, making runs
    /// reproducible.
    pub fn set_seed(&mut self, seed: u64) {
        self.context.set_seed(seed);
    }

    /// Registers a search listener.
    pub fn add_listener(&mut self, listener: Arc<dyn SearchListener<P::Solution>>) {
        self.context.events_mut().add_listener(listener);
    }

    /// Removes a previously registered listener.
    pub fn remove_listener(&mut self, listener: &Arc<dyn SearchListener<P::Solution>>) -> bool {
        self.context.events_mut().remove_listener(listener)
    }

    /// Registers a stop criterion.
    pub fn add_stop_criterion(&mut self, criterion: impl StopCriterion<P::Solution> + 'static) {
        self.stop_criteria.push(Arc::new(criterion));
    }

    /// Sets the period at which the background checker polls the stop
    /// criteria.
    ///
    /// # Panics
    ///
    /// Panics if the period is below one millisecond.
    pub fn set_stop_criterion_check_period(&mut self, period: Duration) {
        assert!(
            period >= MIN_CHECK_PERIOD,
            "stop-criterion check period must be at least one millisecond, got {period:?}"
        );
        self.check_period = period;
    }

    /// Applies a [`SearchConfig`]: seed, check period and configured stop
    /// criteria.
    pub fn configure(&mut self, config: &SearchConfig) {
        if let Some(seed) = config.seed {
            self.set_seed(seed);
        }
        if let Some(period) = config.stop_check_period() {
            self.set_stop_criterion_check_period(period);
        }
        self.stop_criteria.extend(config.termination.build());
    }

    /// The current solution, if one has been installed.
    pub fn current_solution(&self) -> Option<&P::Solution> {
        self.context.current().map(|c| &c.solution)
    }

    /// The evaluation of the current solution.
    pub fn current_evaluation(&self) -> Option<&dyn Evaluation> {
        self.context.current().map(|c| c.evaluation.as_ref())
    }

    /// The validation of the current solution.
    pub fn current_validation(&self) -> Option<&dyn Validation> {
        self.context.current().map(|c| c.validation.as_ref())
    }

    /// A clone of the best solution found so far.
    pub fn best_solution(&self) -> Option<P::Solution> {
        self.context.handle().best_solution()
    }

    /// The evaluation of the best solution found so far.
    pub fn best_evaluation(&self) -> Option<Box<dyn Evaluation>> {
        self.context.handle().best().map(|b| b.evaluation)
    }

    /// The validation of the best solution found so far.
    pub fn best_validation(&self) -> Option<Box<dyn Validation>> {
        self.context.handle().best().map(|b| b.validation)
    }

    /// Installs the solution the next run starts from, replacing the
    /// current solution. The solution is evaluated and validated, listeners
    /// are notified, and the best solution is updated if it improves.
    ///
    /// Returns an [`InvalidState`](VicinityError::InvalidState) error on a
    /// disposed search.
    pub fn set_current_solution(&mut self, solution: P::Solution) -> Result<()> {
        if self.status() == SearchStatus::Disposed {
            return Err(VicinityError::InvalidState(
                "cannot set a solution on a disposed search".into(),
            ));
        }
        self.context.set_current_solution(solution);
        Ok(())
    }

    /// Requests this search to stop. Safe from any thread and idempotent;
    /// has no effect while idle.
    pub fn stop(&self) {
        self.context.stop();
    }

    /// Disposes this search. Legal only while idle; all subsequent
    /// operations fail.
    pub fn dispose(&mut self) -> Result<()> {
        match self.status() {
            SearchStatus::Idle | SearchStatus::Disposed => {
                self.context.set_status(SearchStatus::Disposed);
                Ok(())
            }
            status => Err(VicinityError::InvalidState(format!(
                "cannot dispose a search while {status}"
            ))),
        }
    }

    /// Runs the search until a stop condition fires or the strategy
    /// terminates internally.
    ///
    /// Runtime errors raised inside a step abort the run: the search fires
    /// `search_stopped`, returns to idle and the error is surfaced here.
    pub fn start(&mut self) -> Result<()> {
        if self.status() != SearchStatus::Idle {
            return Err(VicinityError::InvalidState(format!(
                "cannot start a search while {}",
                self.status()
            )));
        }

        let handle = self.handle();
        info!(event = "search_started", search = %handle.name());
        self.context.begin_run();
        self.context.set_status(SearchStatus::Initializing);
        self.context.events().fire_search_started(&handle);
        self.context.seed_current_solution();
        self.strategy.restart();
        self.context.set_status(SearchStatus::Running);

        let checker = (!self.stop_criteria.is_empty()).then(|| {
            StopCriterionChecker::spawn(
                handle.clone(),
                self.stop_criteria.clone(),
                self.check_period,
            )
        });

        let mut result = Ok(());
        loop {
            if handle.is_stop_requested() || self.criteria_signal(&handle) {
                break;
            }
            if let Err(error) = self.strategy.step(&mut self.context) {
                result = Err(error);
                break;
            }
            self.context.complete_step();
        }

        // shuts down and joins the checker thread
        drop(checker);

        self.context.set_status(SearchStatus::Terminating);
        self.context.end_run();
        self.context.events().fire_search_stopped(&handle);
        self.context.set_status(SearchStatus::Idle);
        info!(
            event = "search_stopped",
            search = %handle.name(),
            steps = handle.step_count(),
            accepted = handle.accepted_move_count(),
            rejected = handle.rejected_move_count(),
            runtime_ms = handle.runtime().map(|r| r.as_millis() as u64),
            best = handle.best_value(),
        );
        result
    }

    fn criteria_signal(&self, handle: &SearchHandle<P::Solution>) -> bool {
        self.stop_criteria.iter().any(|c| c.should_stop(handle))
    }
}

impl<P: Problem, A: SearchStrategy<P>> LocalSearch<P> for Search<P, A> {
    fn set_seed(&mut self, seed: u64) {
        Search::set_seed(self, seed);
    }

    fn set_initial_solution(&mut self, solution: P::Solution) {
        self.context.set_current_solution(solution);
    }

    fn run(&mut self) -> Result<()> {
        self.start()
    }

    fn best(&self) -> Option<BestSolution<P::Solution>> {
        self.context.handle().best()
    }
}

impl<P: Problem, A: SearchStrategy<P>> Debug for Search<P, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Search")
            .field("name", &self.name())
            .field("status", &self.status())
            .field("strategy", &self.strategy)
            .field("stop_criteria", &self.stop_criteria.len())
            .finish()
    }
}
