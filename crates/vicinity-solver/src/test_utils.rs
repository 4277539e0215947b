//! Shared fakes for unit tests: a small subset selection problem scored by
//! the sum of the selected IDs, with an O(1) delta evaluation.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use vicinity_core::{
    Evaluation, Move, Objective, Result, SimpleEvaluation, SubsetData, SubsetMove, SubsetProblem,
    SubsetSolution, VicinityError,
};

#[derive(Debug)]
pub(crate) struct Ids(BTreeSet<u32>);

impl SubsetData for Ids {
    fn ids(&self) -> &BTreeSet<u32> {
        &self.0
    }
}

/// Scores a subset by the sum of its selected IDs.
#[derive(Debug)]
pub(crate) struct SumOfIds;

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

/// A sum-of-IDs subset problem over the universe `0..n`.
pub(crate) fn sum_problem(n: u32, size: RangeInclusive<usize>) -> SubsetProblem<Ids> {
    SubsetProblem::new(SumOfIds, Ids((0..n).collect()), size)
}
