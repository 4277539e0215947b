//! Random descent.

use std::sync::Arc;

use vicinity_core::{Neighborhood, Problem, Result, Solution};

use crate::search::{SearchContext, SearchStrategy};

/// Random descent: every step samples a single random move and accepts it
/// if and only if it yields a valid improvement.
///
/// Random descent never converges by itself; it runs until a stop criterion
/// fires. The search only terminates internally when the neighborhood
/// cannot produce any move.
#[derive(Debug)]
pub struct RandomDescent<S: Solution> {
    neighborhood: Arc<dyn Neighborhood<S>>,
}

impl<S: Solution> RandomDescent<S> {
    /// Creates a random descent over the given neighborhood.
    pub fn new(neighborhood: Arc<dyn Neighborhood<S>>) -> Self {
        RandomDescent { neighborhood }
    }

    /// The neighborhood moves are sampled from.
    pub fn neighborhood(&self) -> &Arc<dyn Neighborhood<S>> {
        &self.neighborhood
    }
}

impl<P: Problem> SearchStrategy<P> for RandomDescent<P::Solution> {
    fn name(&self) -> &str {
        "RandomDescent"
    }

    fn step(&mut self, ctx: &mut SearchContext<P>) -> Result<()> {
        match ctx.random_move(self.neighborhood.as_ref()) {
            Some(mv) => {
                let outcome = ctx.evaluate_move(mv.as_ref())?;
                if ctx.is_improvement(&outcome) {
                    ctx.accept_move(mv.as_ref(), outcome)?;
                } else {
                    ctx.reject_move();
                }
            }
            // the neighborhood cannot modify the current solution
            None => ctx.stop(),
        }
        Ok(())
    }
}
