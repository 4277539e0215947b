//! Move and neighborhood abstractions.

use std::any::Any;
use std::fmt::Debug;

use rand::RngCore;

use crate::error::Result;
use crate::solution::Solution;

/// An invertible mutation of a solution.
///
/// Applying and then undoing a move is the identity, provided no other
/// mutation happened in between.
pub trait Move<S: Solution>: Send + Sync + Debug {
    /// Applies this move, modifying the solution in place.
    fn apply(&self, solution: &mut S) -> Result<()>;

    /// Undoes this move, restoring the exact state the solution had before
    /// [`apply`](Move::apply) was called.
    fn undo(&self, solution: &mut S) -> Result<()>;

    /// Returns `self` as [`Any`] so that delta evaluators and validators can
    /// downcast to the concrete move type they support.
    fn as_any(&self) -> &dyn Any;
}

/// A factory of moves applicable to a given solution.
///
/// Neighborhoods carry no per-search state and may be shared by concurrent
/// searches running in separate threads.
pub trait Neighborhood<S: Solution>: Send + Sync + Debug {
    /// Generates a single random move for the given solution, or `None` if
    /// no move can be generated.
    fn random_move(&self, solution: &S, rng: &mut dyn RngCore) -> Option<Box<dyn Move<S>>>;

    /// Generates all moves for the given solution. May return an empty
    /// vector if no moves can be generated.
    fn all_moves(&self, solution: &S) -> Vec<Box<dyn Move<S>>>;
}
