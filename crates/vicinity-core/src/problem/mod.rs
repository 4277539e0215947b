//! Problem composition: objectives, constraints and the problem contract.

mod basic;
mod constraint;
mod objective;

pub use basic::{BasicProblem, SolutionFactory};
pub use constraint::{Constraint, PenalizingConstraint};
pub use objective::Objective;

use rand::RngCore;

use crate::error::Result;
use crate::eval::Evaluation;
use crate::neigh::Move;
use crate::solution::Solution;
use crate::validation::Validation;

/// Binds an objective, constraints, data and a solution factory into a
/// searchable problem.
///
/// Searches only ever talk to this trait; [`BasicProblem`] is the standard
/// implementation and [`crate::subset::SubsetProblem`] specializes it for
/// subset selection.
pub trait Problem: Send + Sync {
    /// The solution type of this problem.
    type Solution: Solution;

    /// Whether evaluations are minimized. Consulted live, so objectives
    /// carrying a mutable direction flag can be flipped between runs.
    fn is_minimizing(&self) -> bool;

    /// Fully evaluates the given solution.
    ///
    /// If the problem has penalizing constraints, the result is a
    /// [`crate::eval::PenalizedEvaluation`] wrapping the objective's
    /// evaluation; otherwise the objective's evaluation is returned as is.
    fn evaluate(&self, solution: &Self::Solution) -> Box<dyn Evaluation>;

    /// Fully validates the given solution against the mandatory constraints.
    /// Penalizing constraints never cause failure, only penalty.
    fn validate(&self, solution: &Self::Solution) -> Box<dyn Validation>;

    /// Evaluates the neighbor obtained by applying `mv` to `solution`,
    /// given the current evaluation.
    fn evaluate_move(
        &self,
        mv: &dyn Move<Self::Solution>,
        solution: &Self::Solution,
        current: &dyn Evaluation,
    ) -> Result<Box<dyn Evaluation>>;

    /// Validates the neighbor obtained by applying `mv` to `solution`,
    /// given the current validation.
    fn validate_move(
        &self,
        mv: &dyn Move<Self::Solution>,
        solution: &Self::Solution,
        current: &dyn Validation,
    ) -> Result<Box<dyn Validation>>;

    /// Creates a random solution using the given source of randomness.
    fn random_solution(&self, rng: &mut dyn RngCore) -> Self::Solution;
}
