//! Objective trait.

use std::fmt::Debug;

use crate::error::Result;
use crate::eval::Evaluation;
use crate::neigh::Move;
use crate::solution::Solution;

/// Real-valued scoring of solutions over problem data.
///
/// # Delta evaluation
///
/// [`evaluate_move`](Objective::evaluate_move) computes the evaluation of
/// the neighbor reached by a move without the caller materializing that
/// neighbor. The default implementation applies the move to a cloned probe
/// solution and evaluates it fully: correct for any objective, O(n) per
/// move, and it never mutates the current solution.
///
/// Objectives that can do better override it, typically by downcasting the
/// move (via [`Move::as_any`]) to the concrete move type they understand and
/// deriving the new evaluation from the current one in O(1). An overriding
/// implementation that receives a move it cannot process must return
/// [`VicinityError::IncompatibleDeltaEvaluation`](crate::error::VicinityError::IncompatibleDeltaEvaluation).
///
/// For every objective it must hold that the delta evaluation of a move
/// equals the full evaluation of the modified solution, up to numeric
/// tolerance.
pub trait Objective<S: Solution, D>: Send + Sync + Debug {
    /// Fully evaluates the given solution.
    fn evaluate(&self, solution: &S, data: &D) -> Box<dyn Evaluation>;

    /// Whether lower evaluations are better. Defaults to maximizing.
    fn is_minimizing(&self) -> bool {
        false
    }

    /// Evaluates the neighbor obtained by applying `mv` to `solution`.
    fn evaluate_move(
        &self,
        mv: &dyn Move<S>,
        solution: &S,
        _current: &dyn Evaluation,
        data: &D,
    ) -> Result<Box<dyn Evaluation>> {
        let mut probe = solution.clone();
        mv.apply(&mut probe)?;
        Ok(self.evaluate(&probe, data))
    }
}
