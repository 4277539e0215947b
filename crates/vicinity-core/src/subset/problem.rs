//! Subset selection problem.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

use rand::seq::IteratorRandom;
use rand::{Rng, RngCore};

use crate::error::{Result, VicinityError};
use crate::eval::Evaluation;
use crate::neigh::Move;
use crate::problem::{BasicProblem, Constraint, Objective, PenalizingConstraint, Problem};
use crate::validation::{SubsetValidation, Validation};

use super::{SubsetMove, SubsetSolution};

/// Data of a subset selection problem: anything that can name the universe
/// of selectable IDs.
pub trait SubsetData {
    /// The universe of IDs that can be selected.
    fn ids(&self) -> &BTreeSet<u32>;
}

/// A [`Problem`] over [`SubsetSolution`]s: select between `min` and `max`
/// IDs from the data's universe, scored by the given objective.
///
/// Validations are wrapped in a [`SubsetValidation`] combining the size
/// check with the mandatory constraints; random solutions are uniform
/// random subsets with a size drawn from the configured range.
pub struct SubsetProblem<D: SubsetData> {
    base: BasicProblem<SubsetSolution, D>,
    min_size: usize,
    max_size: usize,
}

impl<D: SubsetData + Send + Sync + 'static> SubsetProblem<D> {
    /// Creates a subset problem selecting a number of IDs within the given
    /// inclusive size range.
    ///
    /// # Panics
    ///
    /// Panics if the size range is empty, starts at zero, or exceeds the
    /// size of the universe.
    pub fn new(
        objective: impl Objective<SubsetSolution, D> + 'static,
        data: D,
        size: RangeInclusive<usize>,
    ) -> Self {
        let (min_size, max_size) = (*size.start(), *size.end());
        let universe_size = data.ids().len();
        assert!(
            min_size >= 1 && min_size <= max_size && max_size <= universe_size,
            "invalid subset size bounds {min_size}..={max_size} for a universe of {universe_size} IDs"
        );
        let base = BasicProblem::new(objective, data, move |rng, data: &D| {
            random_subset(data.ids(), min_size, max_size, rng)
        });
        SubsetProblem {
            base,
            min_size,
            max_size,
        }
    }

    /// Adds a mandatory constraint.
    pub fn with_constraint(
        mut self,
        constraint: impl Constraint<SubsetSolution, D> + 'static,
    ) -> Self {
        self.base = self.base.with_constraint(constraint);
        self
    }

    /// Adds a penalizing constraint.
    pub fn with_penalizing_constraint(
        mut self,
        constraint: impl PenalizingConstraint<SubsetSolution, D> + 'static,
    ) -> Self {
        self.base = self.base.with_penalizing_constraint(constraint);
        self
    }

    /// The smallest valid selection size.
    pub fn min_subset_size(&self) -> usize {
        self.min_size
    }

    /// The largest valid selection size.
    pub fn max_subset_size(&self) -> usize {
        self.max_size
    }

    /// The problem data.
    pub fn data(&self) -> &D {
        self.base.data()
    }

    /// All constraints violated by the given solution.
    pub fn violated_constraints(
        &self,
        solution: &SubsetSolution,
    ) -> Vec<Arc<dyn Constraint<SubsetSolution, D>>> {
        self.base.violated_constraints(solution)
    }

    fn valid_size(&self, size: usize) -> bool {
        (self.min_size..=self.max_size).contains(&size)
    }
}

fn random_subset(
    ids: &BTreeSet<u32>,
    min_size: usize,
    max_size: usize,
    rng: &mut dyn RngCore,
) -> SubsetSolution {
    let size = rng.random_range(min_size..=max_size);
    let mut solution = SubsetSolution::new(ids.iter().copied());
    let chosen = ids.iter().copied().choose_multiple(rng, size);
    // the chosen IDs are distinct members of the fresh, fully unselected
    // universe, so selection cannot fail
    for id in chosen {
        let _ = solution.select(id);
    }
    solution
}

impl<D: SubsetData + Send + Sync + 'static> Problem for SubsetProblem<D> {
    type Solution = SubsetSolution;

    fn is_minimizing(&self) -> bool {
        self.base.is_minimizing()
    }

    fn evaluate(&self, solution: &SubsetSolution) -> Box<dyn Evaluation> {
        self.base.evaluate(solution)
    }

    fn validate(&self, solution: &SubsetSolution) -> Box<dyn Validation> {
        Box::new(SubsetValidation::new(
            self.valid_size(solution.num_selected()),
            self.base.validate(solution),
        ))
    }

    fn evaluate_move(
        &self,
        mv: &dyn Move<SubsetSolution>,
        solution: &SubsetSolution,
        current: &dyn Evaluation,
    ) -> Result<Box<dyn Evaluation>> {
        self.base.evaluate_move(mv, solution, current)
    }

    fn validate_move(
        &self,
        mv: &dyn Move<SubsetSolution>,
        solution: &SubsetSolution,
        current: &dyn Validation,
    ) -> Result<Box<dyn Validation>> {
        let current = current
            .as_any()
            .downcast_ref::<SubsetValidation>()
            .ok_or_else(|| {
                VicinityError::IncompatibleDeltaValidation(
                    "expected a subset validation as the current validation".into(),
                )
            })?;
        let subset_move = mv.as_any().downcast_ref::<SubsetMove>().ok_or_else(|| {
            VicinityError::IncompatibleDeltaValidation(
                "subset problems can only delta-validate subset moves".into(),
            )
        })?;
        let new_size = (solution.num_selected() + subset_move.num_added())
            .checked_sub(subset_move.num_deleted());
        let valid_size = new_size.is_some_and(|size| self.valid_size(size));
        let constraints =
            self.base
                .validate_move(mv, solution, current.constraint_validation())?;
        Ok(Box::new(SubsetValidation::new(valid_size, constraints)))
    }

    fn random_solution(&self, rng: &mut dyn RngCore) -> SubsetSolution {
        self.base.random_solution(rng)
    }
}

impl<D: SubsetData> fmt::Debug for SubsetProblem<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubsetProblem")
            .field("base", &self.base)
            .field("min_size", &self.min_size)
            .field("max_size", &self.max_size)
            .finish()
    }
}
