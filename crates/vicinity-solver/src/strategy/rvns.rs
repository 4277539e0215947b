//! Reduced variable neighborhood search.

use std::sync::Arc;

use vicinity_core::{Neighborhood, Problem, Result, Solution};

use crate::search::{SearchContext, SearchStrategy};

/// Reduced variable neighborhood search: every step samples one random move
/// from the k-th neighborhood. An improvement is accepted and resets k to
/// 0; a rejection, or a neighborhood unable to produce a move, advances k.
///
/// By default neighborhoods are applied cyclically and the search never
/// terminates internally: random moves may need several cycles through all
/// neighborhoods before an improvement shows up. With cycling disabled, the
/// search stops once every neighborhood has been applied in a row without
/// improvement.
///
/// Useful for larger problems where variable neighborhood descent is too
/// costly because it evaluates every neighbor in every step.
#[derive(Debug)]
pub struct ReducedVariableNeighborhoodSearch<S: Solution> {
    neighborhoods: Vec<Arc<dyn Neighborhood<S>>>,
    cycle: bool,
    k: usize,
}

impl<S: Solution> ReducedVariableNeighborhoodSearch<S> {
    /// Creates a reduced search over the given ordered neighborhoods,
    /// applying them cyclically.
    ///
    /// # Panics
    ///
    /// Panics if the list is empty.
    pub fn new(neighborhoods: Vec<Arc<dyn Neighborhood<S>>>) -> Self {
        assert!(
            !neighborhoods.is_empty(),
            "reduced variable neighborhood search requires at least one neighborhood"
        );
        ReducedVariableNeighborhoodSearch {
            neighborhoods,
            cycle: true,
            k: 0,
        }
    }

    /// Sets whether neighborhoods are applied cyclically. When disabled,
    /// the search terminates internally after a full unproductive pass over
    /// all neighborhoods.
    pub fn with_cycling(mut self, cycle: bool) -> Self {
        self.cycle = cycle;
        self
    }

    /// The ordered neighborhoods.
    pub fn neighborhoods(&self) -> &[Arc<dyn Neighborhood<S>>] {
        &self.neighborhoods
    }
}

impl<P: Problem> SearchStrategy<P> for ReducedVariableNeighborhoodSearch<P::Solution> {
    fn name(&self) -> &str {
        "ReducedVariableNeighborhoodSearch"
    }

    fn restart(&mut self) {
        self.k = 0;
    }

    fn step(&mut self, ctx: &mut SearchContext<P>) -> Result<()> {
        if self.k >= self.neighborhoods.len() {
            if self.cycle {
                self.k = 0;
            } else {
                ctx.stop();
                return Ok(());
            }
        }
        match ctx.random_move(self.neighborhoods[self.k].as_ref()) {
            Some(mv) => {
                let outcome = ctx.evaluate_move(mv.as_ref())?;
                if ctx.is_improvement(&outcome) {
                    ctx.accept_move(mv.as_ref(), outcome)?;
                    self.k = 0;
                } else {
                    ctx.reject_move();
                    self.k += 1;
                }
            }
            // try the next neighborhood in the next step
            None => self.k += 1,
        }
        Ok(())
    }
}
