//! Variable neighborhood search.

use std::fmt;
use std::sync::Arc;

use rand::RngCore;

use vicinity_core::{Move, Neighborhood, Problem, Result, VicinityError};

use crate::search::{LocalSearch, SearchContext, SearchStrategy};

/// Factory producing a fresh embedded local search per VNS iteration.
///
/// The factory receives the problem the outer search works on and returns a
/// fully configured search, including its own stop criteria; those fire
/// independently of the outer search.
pub type LocalSearchFactory<P> = Box<dyn Fn(Arc<P>) -> Box<dyn LocalSearch<P>> + Send + Sync>;

/// Variable neighborhood search: shake, descend, move or not.
///
/// Every step clones the current solution, perturbs it with one random move
/// from the s-th shaking neighborhood, and hands the shaken solution to a
/// fresh embedded local search built by the factory. If the embedded
/// search's best solution strictly improves the current one, it is adopted
/// and s resets to 0; otherwise s advances, cycling back to the first
/// shaking neighborhood after the last. VNS never terminates internally;
/// attach a stop criterion to the outer search.
///
/// The outer search owns each embedded search's lifecycle: it constructs
/// it, seeds it from its own RNG, runs it to completion and drops it.
pub struct VariableNeighborhoodSearch<P: Problem> {
    shaking: Vec<Arc<dyn Neighborhood<P::Solution>>>,
    factory: LocalSearchFactory<P>,
    s: usize,
}

impl<P: Problem> VariableNeighborhoodSearch<P> {
    /// Creates a variable neighborhood search from the given shaking
    /// neighborhoods and local-search factory.
    ///
    /// # Panics
    ///
    /// Panics if the list of shaking neighborhoods is empty.
    pub fn new(
        shaking: Vec<Arc<dyn Neighborhood<P::Solution>>>,
        factory: impl Fn(Arc<P>) -> Box<dyn LocalSearch<P>> + Send + Sync + 'static,
    ) -> Self {
        assert!(
            !shaking.is_empty(),
            "variable neighborhood search requires at least one shaking neighborhood"
        );
        VariableNeighborhoodSearch {
            shaking,
            factory: Box::new(factory),
            s: 0,
        }
    }

    /// The ordered shaking neighborhoods.
    pub fn shaking_neighborhoods(&self) -> &[Arc<dyn Neighborhood<P::Solution>>] {
        &self.shaking
    }
}

impl<P: Problem> SearchStrategy<P> for VariableNeighborhoodSearch<P> {
    fn name(&self) -> &str {
        "VariableNeighborhoodSearch"
    }

    fn restart(&mut self) {
        self.s = 0;
    }

    fn step(&mut self, ctx: &mut SearchContext<P>) -> Result<()> {
        if self.s >= self.shaking.len() {
            // shaking neighborhoods are applied cyclically
            self.s = 0;
        }

        let mut shaken = match ctx.current() {
            Some(current) => current.solution.clone(),
            None => {
                return Err(VicinityError::InvalidState(
                    "variable neighborhood search requires a current solution".into(),
                ))
            }
        };
        let Some(mv) = self.shaking[self.s].random_move(&shaken, ctx.rng()) else {
            // this shaking neighborhood cannot perturb the current solution
            self.s += 1;
            return Ok(());
        };
        mv.apply(&mut shaken)?;

        let mut local = (self.factory)(Arc::clone(ctx.problem()));
        let seed = ctx.rng().next_u64();
        local.set_seed(seed);
        local.set_initial_solution(shaken);
        local.run()?;

        match local.best() {
            Some(best)
                if ctx.is_improvement_over_current(
                    best.evaluation.value(),
                    best.validation.passed(),
                ) =>
            {
                ctx.update_current_solution(best.solution, best.evaluation, best.validation);
                self.s = 0;
            }
            _ => self.s += 1,
        }
        Ok(())
    }
}

impl<P: Problem> fmt::Debug for VariableNeighborhoodSearch<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableNeighborhoodSearch")
            .field("shaking_neighborhoods", &self.shaking.len())
            .field("s", &self.s)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Search;
    use crate::stop::MaxSteps;
    use crate::strategy::SteepestDescent;
    use crate::test_utils::{sum_problem, Ids};
    use vicinity_core::{
        DisjointMultiSwapNeighborhood, Evaluation, SingleSwapNeighborhood, SubsetProblem,
        SubsetSolution,
    };

    fn vns_search() -> Search<SubsetProblem<Ids>, VariableNeighborhoodSearch<SubsetProblem<Ids>>> {
        let shaking: Vec<Arc<dyn Neighborhood<SubsetSolution>>> = vec![
            Arc::new(DisjointMultiSwapNeighborhood::new(2)),
            Arc::new(DisjointMultiSwapNeighborhood::new(3)),
        ];
        let strategy = VariableNeighborhoodSearch::new(shaking, |problem| {
            let local: Search<SubsetProblem<Ids>, SteepestDescent<SubsetSolution>> =
                Search::new(
                    problem,
                    SteepestDescent::new(Arc::new(SingleSwapNeighborhood::new())),
                );
            Box::new(local)
        });
        Search::new(sum_problem(10, 3..=3), strategy)
    }

    #[test]
    fn test_finds_the_optimum_through_embedded_searches() {
        let mut search = vns_search();
        search.set_seed(42);
        search.add_stop_criterion(MaxSteps::new(6));
        search.start().unwrap();
        // the embedded steepest descent alone reaches the global optimum
        assert_eq!(search.best_evaluation().unwrap().value(), 24.0);
        assert_eq!(search.status(), crate::SearchStatus::Idle);
    }

    #[test]
    #[should_panic(expected = "at least one shaking neighborhood")]
    fn test_empty_shaking_list_panics() {
        let _ = VariableNeighborhoodSearch::<SubsetProblem<Ids>>::new(Vec::new(), |problem| {
            let local: Search<SubsetProblem<Ids>, SteepestDescent<SubsetSolution>> =
                Search::new(
                    problem,
                    SteepestDescent::new(Arc::new(SingleSwapNeighborhood::new())),
                );
            Box::new(local)
        });
    }
}
