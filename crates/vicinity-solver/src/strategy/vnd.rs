//! Variable neighborhood descent.

use std::sync::Arc;

use vicinity_core::{Neighborhood, Problem, Result, Solution};

use crate::search::{SearchContext, SearchStrategy};

/// Variable neighborhood descent: explores an ordered list of neighborhoods
/// with steepest descent, restarting from the first neighborhood whenever
/// an improvement is found.
///
/// Every step enumerates all moves of the k-th neighborhood. If the best of
/// them improves, it is accepted and k resets to 0; otherwise k advances.
/// Once every neighborhood has been exhausted without improvement, the
/// current solution is a local optimum with respect to all of them and the
/// search terminates internally.
#[derive(Debug)]
pub struct VariableNeighborhoodDescent<S: Solution> {
    neighborhoods: Vec<Arc<dyn Neighborhood<S>>>,
    k: usize,
}

impl<S: Solution> VariableNeighborhoodDescent<S> {
    /// Creates a descent over the given ordered neighborhoods.
    ///
    /// # Panics
    ///
    /// Panics if the list is empty.
    pub fn new(neighborhoods: Vec<Arc<dyn Neighborhood<S>>>) -> Self {
        assert!(
            !neighborhoods.is_empty(),
            "variable neighborhood descent requires at least one neighborhood"
        );
        VariableNeighborhoodDescent {
            neighborhoods,
            k: 0,
        }
    }

    /// The ordered neighborhoods.
    pub fn neighborhoods(&self) -> &[Arc<dyn Neighborhood<S>>] {
        &self.neighborhoods
    }
}

impl<P: Problem> SearchStrategy<P> for VariableNeighborhoodDescent<P::Solution> {
    fn name(&self) -> &str {
        "VariableNeighborhoodDescent"
    }

    fn restart(&mut self) {
        self.k = 0;
    }

    fn step(&mut self, ctx: &mut SearchContext<P>) -> Result<()> {
        if self.k >= self.neighborhoods.len() {
            ctx.stop();
            return Ok(());
        }
        let moves = ctx.all_moves(self.neighborhoods[self.k].as_ref());
        match ctx.best_move(&moves, true)? {
            Some((mv, outcome)) => {
                ctx.accept_move(mv, outcome)?;
                self.k = 0;
            }
            None => {
                self.k += 1;
                if self.k >= self.neighborhoods.len() {
                    // local optimum for all neighborhoods
                    ctx.stop();
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Search;
    use crate::test_utils::sum_problem;
    use vicinity_core::{DisjointMultiSwapNeighborhood, Evaluation, SingleSwapNeighborhood};

    #[test]
    fn test_converges_over_all_neighborhoods() {
        let neighborhoods: Vec<Arc<dyn Neighborhood<_>>> = vec![
            Arc::new(SingleSwapNeighborhood::new()),
            Arc::new(DisjointMultiSwapNeighborhood::new(2)),
        ];
        let mut search = Search::new(
            sum_problem(10, 3..=3),
            VariableNeighborhoodDescent::new(neighborhoods),
        );
        search.set_seed(42);
        // terminates internally once both neighborhoods are exhausted
        search.start().unwrap();

        assert_eq!(search.best_evaluation().unwrap().value(), 24.0);
    }

    #[test]
    fn test_starting_from_the_optimum_stops_quickly() {
        let neighborhoods: Vec<Arc<dyn Neighborhood<_>>> =
            vec![Arc::new(SingleSwapNeighborhood::new())];
        let mut search = Search::new(
            sum_problem(10, 3..=3),
            VariableNeighborhoodDescent::new(neighborhoods),
        );
        search
            .set_current_solution(
                vicinity_core::SubsetSolution::with_selection(0..10, [7, 8, 9]).unwrap(),
            )
            .unwrap();
        search.start().unwrap();
        // a single step discovers that no improving move exists
        assert_eq!(search.handle().step_count(), 1);
        assert_eq!(search.best_evaluation().unwrap().value(), 24.0);
    }

    #[test]
    #[should_panic(expected = "at least one neighborhood")]
    fn test_empty_neighborhood_list_panics() {
        VariableNeighborhoodDescent::<vicinity_core::SubsetSolution>::new(Vec::new());
    }
}
