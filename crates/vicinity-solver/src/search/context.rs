//! Search context: current-solution state and move accept/reject machinery.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace};

use vicinity_core::{
    Evaluation, Move, Neighborhood, Problem, Result, Solution, Validation, VicinityError,
};

use crate::event::SearchEventSupport;
use crate::state::{BestSolution, SearchHandle, SharedSearchState};
use crate::status::SearchStatus;

/// The current solution of a search together with its evaluation and
/// validation.
#[derive(Debug, Clone)]
pub struct CurrentSolution<S: Solution> {
    /// The current solution.
    pub solution: S,
    /// Its evaluation.
    pub evaluation: Box<dyn Evaluation>,
    /// Its validation.
    pub validation: Box<dyn Validation>,
}

/// The delta evaluation and validation of a candidate move, produced by
/// [`SearchContext::evaluate_move`] and consumed by
/// [`SearchContext::accept_move`].
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    /// Evaluation of the neighboring solution.
    pub evaluation: Box<dyn Evaluation>,
    /// Validation of the neighboring solution.
    pub validation: Box<dyn Validation>,
}

/// The mutable state a [`SearchStrategy`](crate::SearchStrategy) works on:
/// the problem, the per-search RNG, the current solution and the shared
/// counters, plus the accept/reject and best-move machinery every
/// neighborhood search shares.
pub struct SearchContext<P: Problem> {
    problem: Arc<P>,
    state: Arc<SharedSearchState<P::Solution>>,
    handle: SearchHandle<P::Solution>,
    events: SearchEventSupport<P::Solution>,
    rng: StdRng,
    current: Option<CurrentSolution<P::Solution>>,
}

impl<P: Problem> SearchContext<P> {
    pub(crate) fn new(problem: Arc<P>, name: String) -> Self {
        let minimizing = problem.is_minimizing();
        let state = Arc::new(SharedSearchState::new(name, minimizing));
        let handle = SearchHandle::new(Arc::clone(&state));
        SearchContext {
            problem,
            state,
            handle,
            events: SearchEventSupport::new(),
            rng: StdRng::from_os_rng(),
            current: None,
        }
    }

    /// The problem being solved.
    pub fn problem(&self) -> &Arc<P> {
        &self.problem
    }

    /// The thread-safe handle of this search.
    pub fn handle(&self) -> &SearchHandle<P::Solution> {
        &self.handle
    }

    /// The per-search source of randomness.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub(crate) fn set_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub(crate) fn events(&self) -> &SearchEventSupport<P::Solution> {
        &self.events
    }

    pub(crate) fn events_mut(&mut self) -> &mut SearchEventSupport<P::Solution> {
        &mut self.events
    }

    pub(crate) fn set_status(&self, status: SearchStatus) {
        self.state.set_status(status);
    }

    /// The current solution, if one has been installed.
    pub fn current(&self) -> Option<&CurrentSolution<P::Solution>> {
        self.current.as_ref()
    }

    /// Requests this search to stop after the in-flight step.
    pub fn stop(&self) {
        self.handle.stop();
    }

    /// Samples a random move from the given neighborhood for the current
    /// solution.
    pub fn random_move(
        &mut self,
        neighborhood: &dyn Neighborhood<P::Solution>,
    ) -> Option<Box<dyn Move<P::Solution>>> {
        let current = self.current.as_ref()?;
        neighborhood.random_move(&current.solution, &mut self.rng)
    }

    /// Generates all moves from the given neighborhood for the current
    /// solution.
    pub fn all_moves(
        &self,
        neighborhood: &dyn Neighborhood<P::Solution>,
    ) -> Vec<Box<dyn Move<P::Solution>>> {
        match &self.current {
            Some(current) => neighborhood.all_moves(&current.solution),
            None => Vec::new(),
        }
    }

    fn is_better(&self, candidate: f64, reference: f64) -> bool {
        if self.problem.is_minimizing() {
            candidate < reference
        } else {
            candidate > reference
        }
    }

    /// Whether a candidate with the given value and validity improves on
    /// the current solution: the candidate must be valid, and either the
    /// current solution is invalid or the candidate is strictly better.
    pub fn is_improvement_over_current(&self, value: f64, passed: bool) -> bool {
        if !passed {
            return false;
        }
        match &self.current {
            Some(current) => {
                !current.validation.passed() || self.is_better(value, current.evaluation.value())
            }
            None => true,
        }
    }

    /// Delta-evaluates and delta-validates the given move against the
    /// current solution.
    pub fn evaluate_move(&self, mv: &dyn Move<P::Solution>) -> Result<MoveOutcome> {
        let current = self.current.as_ref().ok_or_else(|| {
            VicinityError::InvalidState("cannot evaluate a move without a current solution".into())
        })?;
        let evaluation =
            self.problem
                .evaluate_move(mv, &current.solution, current.evaluation.as_ref())?;
        let validation =
            self.problem
                .validate_move(mv, &current.solution, current.validation.as_ref())?;
        Ok(MoveOutcome {
            evaluation,
            validation,
        })
    }

    /// Whether the given move outcome improves on the current solution.
    pub fn is_improvement(&self, outcome: &MoveOutcome) -> bool {
        self.is_improvement_over_current(outcome.evaluation.value(), outcome.validation.passed())
    }

    /// Installs a new current solution, evaluating and validating it fully.
    /// Updates the best solution if the new current is valid and strictly
    /// better.
    pub fn set_current_solution(&mut self, solution: P::Solution) {
        let evaluation = self.problem.evaluate(&solution);
        let validation = self.problem.validate(&solution);
        self.install_current(CurrentSolution {
            solution,
            evaluation,
            validation,
        });
    }

    /// Installs a new current solution from pre-computed evaluation and
    /// validation, e.g. after running an embedded search.
    pub fn update_current_solution(
        &mut self,
        solution: P::Solution,
        evaluation: Box<dyn Evaluation>,
        validation: Box<dyn Validation>,
    ) {
        self.install_current(CurrentSolution {
            solution,
            evaluation,
            validation,
        });
    }

    /// Applies an accepted move to the current solution, installs the
    /// pre-computed outcome as the new current evaluation and validation,
    /// and updates the best solution on improvement.
    pub fn accept_move(&mut self, mv: &dyn Move<P::Solution>, outcome: MoveOutcome) -> Result<()> {
        let mut current = self.current.take().ok_or_else(|| {
            VicinityError::InvalidState("cannot accept a move without a current solution".into())
        })?;
        mv.apply(&mut current.solution)?;
        current.evaluation = outcome.evaluation;
        current.validation = outcome.validation;
        trace!(
            event = "move_accepted",
            search = %self.handle.name(),
            value = current.evaluation.value(),
        );
        self.install_current(current);
        self.state.record_accepted_move();
        Ok(())
    }

    /// Rejects a move: only the rejected-move counter changes.
    pub fn reject_move(&mut self) {
        self.state.record_rejected_move();
    }

    /// Scans the given candidate moves and returns the valid one with the
    /// best delta evaluation, together with its outcome. With
    /// `require_improvement`, only candidates improving on the current
    /// solution qualify. Ties are broken by first encounter. Returns `None`
    /// if no candidate qualifies.
    pub fn best_move<'m>(
        &self,
        moves: &'m [Box<dyn Move<P::Solution>>],
        require_improvement: bool,
    ) -> Result<Option<(&'m dyn Move<P::Solution>, MoveOutcome)>> {
        self.best_move_where(moves, require_improvement, |_| true)
    }

    /// Like [`best_move`](Self::best_move), additionally skipping
    /// candidates rejected by the given filter.
    pub fn best_move_where<'m, F>(
        &self,
        moves: &'m [Box<dyn Move<P::Solution>>],
        require_improvement: bool,
        filter: F,
    ) -> Result<Option<(&'m dyn Move<P::Solution>, MoveOutcome)>>
    where
        F: Fn(&dyn Move<P::Solution>) -> bool,
    {
        let mut best: Option<(&dyn Move<P::Solution>, MoveOutcome, f64)> = None;
        for mv in moves {
            if !filter(mv.as_ref()) {
                continue;
            }
            let outcome = self.evaluate_move(mv.as_ref())?;
            if !outcome.validation.passed() {
                continue;
            }
            let value = outcome.evaluation.value();
            if require_improvement && !self.is_improvement(&outcome) {
                continue;
            }
            let replaces = match &best {
                Some((_, _, best_value)) => self.is_better(value, *best_value),
                None => true,
            };
            if replaces {
                best = Some((mv.as_ref(), outcome, value));
            }
        }
        Ok(best.map(|(mv, outcome, _)| (mv, outcome)))
    }

    /// Installs the given current solution, updating the best solution and
    /// firing events.
    fn install_current(&mut self, current: CurrentSolution<P::Solution>) {
        self.maybe_update_best(&current);
        self.events.fire_new_current_solution(
            &self.handle,
            &current.solution,
            current.evaluation.as_ref(),
            current.validation.as_ref(),
        );
        self.current = Some(current);
    }

    fn maybe_update_best(&mut self, candidate: &CurrentSolution<P::Solution>) {
        if !candidate.validation.passed() {
            return;
        }
        let value = candidate.evaluation.value();
        let previous = self.handle.best_value();
        let improved = match previous {
            Some(previous) => self.is_better(value, previous),
            None => true,
        };
        if !improved {
            return;
        }
        self.state
            .record_improvement(previous.map(|p| (value - p).abs()));
        self.state.set_best(BestSolution {
            solution: candidate.solution.clone(),
            evaluation: candidate.evaluation.clone(),
            validation: candidate.validation.clone(),
        });
        debug!(
            event = "new_best_solution",
            search = %self.handle.name(),
            value = value,
        );
        self.events.fire_new_best_solution(
            &self.handle,
            &candidate.solution,
            candidate.evaluation.as_ref(),
            candidate.validation.as_ref(),
        );
    }

    /// Resets the per-run counters and timestamps.
    pub(crate) fn begin_run(&mut self) {
        self.state.begin_run(self.problem.is_minimizing());
    }

    /// Seeds the run's current solution: the preserved best if any valid
    /// solution was found before, a random solution on a fresh search, and
    /// the existing current solution otherwise.
    pub(crate) fn seed_current_solution(&mut self) {
        if let Some(best) = self.handle.best_solution() {
            self.set_current_solution(best);
        } else if self.current.is_none() {
            let solution = self.problem.random_solution(&mut self.rng);
            self.set_current_solution(solution);
        }
    }

    pub(crate) fn end_run(&self) {
        self.state.end_run();
    }

    /// Records a completed step and notifies listeners.
    pub(crate) fn complete_step(&mut self) {
        let step = self.state.record_step();
        trace!(event = "step_completed", search = %self.handle.name(), step = step);
        self.events.fire_step_completed(&self.handle, step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vicinity_core::{BasicProblem, Objective, SimpleEvaluation};

    #[derive(Debug)]
    struct ValueObjective;

    impl Objective<i64, ()> for ValueObjective {
        fn evaluate(&self, solution: &i64, _data: &()) -> Box<dyn Evaluation> {
            Box::new(SimpleEvaluation::of(*solution as f64))
        }
    }

    #[derive(Debug, Clone, Copy)]
    struct Shift(i64);

    impl Move<i64> for Shift {
        fn apply(&self, solution: &mut i64) -> Result<()> {
            *solution += self.0;
            Ok(())
        }

        fn undo(&self, solution: &mut i64) -> Result<()> {
            *solution -= self.0;
            Ok(())
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    fn context() -> SearchContext<BasicProblem<i64, ()>> {
        let problem = BasicProblem::new(ValueObjective, (), |_, _| 0);
        SearchContext::new(Arc::new(problem), "test".into())
    }

    #[test]
    fn test_accept_and_reject_counters() {
        // 30 moves with a fixed two-out-of-three acceptance pattern
        let mut ctx = context();
        ctx.set_current_solution(0);
        for i in 0..30 {
            let mv = if i % 3 == 2 { Shift(-1) } else { Shift(1) };
            let outcome = ctx.evaluate_move(&mv).unwrap();
            if ctx.is_improvement(&outcome) {
                ctx.accept_move(&mv, outcome).unwrap();
            } else {
                ctx.reject_move();
            }
        }
        assert_eq!(ctx.handle().accepted_move_count(), 20);
        assert_eq!(ctx.handle().rejected_move_count(), 10);
        assert_eq!(ctx.current().unwrap().solution, 20);
    }

    #[test]
    fn test_best_follows_current_improvements() {
        let mut ctx = context();
        ctx.set_current_solution(5);
        assert_eq!(ctx.handle().best_value(), Some(5.0));

        // a worse current solution does not degrade the best
        ctx.set_current_solution(3);
        assert_eq!(ctx.handle().best_value(), Some(5.0));

        ctx.set_current_solution(8);
        assert_eq!(ctx.handle().best_value(), Some(8.0));
    }

    #[test]
    fn test_best_move_picks_the_steepest() {
        let mut ctx = context();
        ctx.set_current_solution(0);
        let moves: Vec<Box<dyn Move<i64>>> =
            vec![Box::new(Shift(1)), Box::new(Shift(5)), Box::new(Shift(3))];
        let (mv, outcome) = ctx.best_move(&moves, true).unwrap().unwrap();
        assert_eq!(outcome.evaluation.value(), 5.0);
        let mv = mv.as_any().downcast_ref::<Shift>().unwrap();
        assert_eq!(mv.0, 5);
    }

    #[test]
    fn test_best_move_requires_improvement() {
        let mut ctx = context();
        ctx.set_current_solution(0);
        let moves: Vec<Box<dyn Move<i64>>> = vec![Box::new(Shift(-2)), Box::new(Shift(-1))];
        assert!(ctx.best_move(&moves, true).unwrap().is_none());
        // without the improvement requirement the least bad move wins
        let (_, outcome) = ctx.best_move(&moves, false).unwrap().unwrap();
        assert_eq!(outcome.evaluation.value(), -1.0);
    }

    #[test]
    fn test_best_move_applies_the_filter() {
        let mut ctx = context();
        ctx.set_current_solution(0);
        let moves: Vec<Box<dyn Move<i64>>> =
            vec![Box::new(Shift(1)), Box::new(Shift(5)), Box::new(Shift(3))];
        let (_, outcome) = ctx
            .best_move_where(&moves, true, |mv| {
                mv.as_any().downcast_ref::<Shift>().is_some_and(|s| s.0 < 5)
            })
            .unwrap()
            .unwrap();
        assert_eq!(outcome.evaluation.value(), 3.0);
    }

    #[test]
    fn test_evaluate_move_without_current_fails() {
        let ctx = context();
        assert!(matches!(
            ctx.evaluate_move(&Shift(1)),
            Err(VicinityError::InvalidState(_))
        ));
    }

    #[test]
    fn test_improvement_delta_is_recorded() {
        let mut ctx = context();
        ctx.set_current_solution(5);
        // first best: no delta yet
        assert_eq!(ctx.handle().last_improvement_delta(), None);
        ctx.set_current_solution(8);
        assert_eq!(ctx.handle().last_improvement_delta(), Some(3.0));
    }
}
