//! Constraint traits.

use std::fmt::Debug;

use crate::error::Result;
use crate::neigh::Move;
use crate::solution::Solution;
use crate::validation::{PenalizingValidation, Validation};

/// A predicate over solutions and problem data.
///
/// Mandatory constraints reject solutions: a solution is valid if and only
/// if every mandatory constraint passes.
///
/// The delta form [`validate_move`](Constraint::validate_move) follows the
/// same rules as [`Objective::evaluate_move`](crate::problem::Objective::evaluate_move):
/// the default clones a probe solution and validates it fully; overriding
/// implementations return
/// [`VicinityError::IncompatibleDeltaValidation`](crate::error::VicinityError::IncompatibleDeltaValidation)
/// for moves they cannot process.
pub trait Constraint<S: Solution, D>: Send + Sync + Debug {
    /// Fully validates the given solution.
    fn validate(&self, solution: &S, data: &D) -> Box<dyn Validation>;

    /// Validates the neighbor obtained by applying `mv` to `solution`.
    fn validate_move(
        &self,
        mv: &dyn Move<S>,
        solution: &S,
        _current: &dyn Validation,
        data: &D,
    ) -> Result<Box<dyn Validation>> {
        let mut probe = solution.clone();
        mv.apply(&mut probe)?;
        Ok(self.validate(&probe, data))
    }
}

/// A constraint that assigns a penalty instead of rejecting solutions.
///
/// Penalizing constraints never make a solution invalid; their penalties are
/// folded into the problem's evaluation (see
/// [`PenalizedEvaluation`](crate::eval::PenalizedEvaluation)). A passed
/// penalizing validation always carries a zero penalty.
///
/// Implementors also provide the plain [`Constraint`] surface; typically
/// `validate` simply boxes the result of
/// [`penalizing_validation`](PenalizingConstraint::penalizing_validation).
pub trait PenalizingConstraint<S: Solution, D>: Constraint<S, D> {
    /// Fully validates the given solution, producing a penalty.
    fn penalizing_validation(&self, solution: &S, data: &D) -> PenalizingValidation;

    /// Validates the neighbor obtained by applying `mv` to `solution`.
    fn penalizing_validation_move(
        &self,
        mv: &dyn Move<S>,
        solution: &S,
        _current: &PenalizingValidation,
        data: &D,
    ) -> Result<PenalizingValidation> {
        let mut probe = solution.clone();
        mv.apply(&mut probe)?;
        Ok(self.penalizing_validation(&probe, data))
    }
}
