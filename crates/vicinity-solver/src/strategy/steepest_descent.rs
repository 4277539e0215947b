//! Steepest descent.

use std::sync::Arc;

use vicinity_core::{Neighborhood, Problem, Result, Solution};

use crate::search::{SearchContext, SearchStrategy};

/// Steepest descent: every step enumerates all moves of the neighborhood
/// and accepts the best strictly improving one. The search terminates
/// internally when no improving move exists, i.e. in a local optimum.
#[derive(Debug)]
pub struct SteepestDescent<S: Solution> {
    neighborhood: Arc<dyn Neighborhood<S>>,
}

impl<S: Solution> SteepestDescent<S> {
    /// Creates a steepest descent over the given neighborhood.
    pub fn new(neighborhood: Arc<dyn Neighborhood<S>>) -> Self {
        SteepestDescent { neighborhood }
    }

    /// The neighborhood moves are enumerated from.
    pub fn neighborhood(&self) -> &Arc<dyn Neighborhood<S>> {
        &self.neighborhood
    }
}

impl<P: Problem> SearchStrategy<P> for SteepestDescent<P::Solution> {
    fn name(&self) -> &str {
        "SteepestDescent"
    }

    fn step(&mut self, ctx: &mut SearchContext<P>) -> Result<()> {
        let moves = ctx.all_moves(self.neighborhood.as_ref());
        match ctx.best_move(&moves, true)? {
            Some((mv, outcome)) => ctx.accept_move(mv, outcome)?,
            // local optimum
            None => ctx.stop(),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Search;
    use crate::test_utils::sum_problem;
    use vicinity_core::{Evaluation, SingleSwapNeighborhood};

    #[test]
    fn test_terminates_in_local_optimum() {
        // maximizing the sum of three selected IDs out of 0..10: swapping
        // greedily always ends in {7, 8, 9}
        let mut search = Search::new(
            sum_problem(10, 3..=3),
            SteepestDescent::new(Arc::new(SingleSwapNeighborhood::new())),
        );
        search.set_seed(42);
        // no stop criterion: the strategy terminates internally
        search.start().unwrap();

        let best = search.best_solution().unwrap();
        assert_eq!(
            best.selected_ids().iter().copied().collect::<Vec<_>>(),
            [7, 8, 9]
        );
        assert_eq!(search.best_evaluation().unwrap().value(), 24.0);
    }

    #[test]
    fn test_rejects_nothing() {
        let mut search = Search::new(
            sum_problem(10, 3..=3),
            SteepestDescent::new(Arc::new(SingleSwapNeighborhood::new())),
        );
        search.set_seed(7);
        search.start().unwrap();
        // steepest descent accepts the best move or stops; it never rejects
        assert_eq!(search.handle().rejected_move_count(), 0);
    }
}
