//! Fakes shared by the integration tests: a subset selection problem
//! scored by the sum of the selected IDs, plus always-failing constraints.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use vicinity_core::{
    Constraint, Evaluation, Move, Objective, PenalizingConstraint, PenalizingValidation, Result,
    SimpleEvaluation, SimpleValidation, SubsetData, SubsetMove, SubsetProblem, SubsetSolution,
    Validation, VicinityError,
};

#[derive(Debug)]
pub struct Ids(pub BTreeSet<u32>);

impl SubsetData for Ids {
    fn ids(&self) -> &BTreeSet<u32> {
        &self.0
    }
}

/// Scores a subset by the sum of its selected IDs, with an O(1) delta.
#[derive(Debug)]
pub struct SumOfIds;

impl Objective<SubsetSolution, Ids> for SumOfIds {
    fn evaluate(&self, solution: &SubsetSolution, _data: &Ids) -> Box<dyn Evaluation> {
        let sum: u32 = solution.selected_ids().iter().sum();
        Box::new(SimpleEvaluation::of(sum as f64))
    }

    fn evaluate_move(
        &self,
        mv: &dyn Move<SubsetSolution>,
        _solution: &SubsetSolution,
        current: &dyn Evaluation,
        _data: &Ids,
    ) -> Result<Box<dyn Evaluation>> {
        let mv = mv.as_any().downcast_ref::<SubsetMove>().ok_or_else(|| {
            VicinityError::IncompatibleDeltaEvaluation(
                "sum-of-ids objective expects subset moves".into(),
            )
        })?;
        let added: u32 = mv.added_ids().iter().sum();
        let deleted: u32 = mv.deleted_ids().iter().sum();
        Ok(Box::new(SimpleEvaluation::of(
            current.value() + added as f64 - deleted as f64,
        )))
    }
}

/// A mandatory constraint no solution ever satisfies.
#[derive(Debug)]
pub struct NeverSatisfied;

impl Constraint<SubsetSolution, Ids> for NeverSatisfied {
    fn validate(&self, _solution: &SubsetSolution, _data: &Ids) -> Box<dyn Validation> {
        Box::new(SimpleValidation::FAILED)
    }
}

/// A penalizing constraint assigning a fixed penalty to every solution.
#[derive(Debug)]
pub struct FixedPenalty(pub f64);

impl Constraint<SubsetSolution, Ids> for FixedPenalty {
    fn validate(&self, solution: &SubsetSolution, data: &Ids) -> Box<dyn Validation> {
        Box::new(self.penalizing_validation(solution, data))
    }
}

impl PenalizingConstraint<SubsetSolution, Ids> for FixedPenalty {
    fn penalizing_validation(
        &self,
        _solution: &SubsetSolution,
        _data: &Ids,
    ) -> PenalizingValidation {
        PenalizingValidation::fail(self.0)
    }
}

/// A sum-of-IDs subset problem over the universe `0..n`.
pub fn sum_problem(n: u32, size: RangeInclusive<usize>) -> SubsetProblem<Ids> {
    SubsetProblem::new(SumOfIds, Ids((0..n).collect()), size)
}
