//! Standard problem composition.

use std::fmt;
use std::sync::Arc;

use rand::RngCore;

use crate::error::{Result, VicinityError};
use crate::eval::{Evaluation, PenalizedEvaluation};
use crate::neigh::Move;
use crate::solution::Solution;
use crate::validation::{CompositeValidation, SimpleValidation, Validation};

use super::{Constraint, Objective, PenalizingConstraint, Problem};

/// Random-solution factory used by [`BasicProblem`].
pub type SolutionFactory<S, D> = Box<dyn Fn(&mut dyn RngCore, &D) -> S + Send + Sync>;

/// The standard [`Problem`] implementation: an objective, a data handle, a
/// random-solution factory and any number of mandatory and penalizing
/// constraints.
///
/// Constraints are kept in registration order; that order determines the
/// composition of validations and penalties, so delta forms can pair each
/// constraint with its previous outcome by index.
pub struct BasicProblem<S: Solution, D> {
    objective: Arc<dyn Objective<S, D>>,
    data: D,
    factory: SolutionFactory<S, D>,
    mandatory: Vec<Arc<dyn Constraint<S, D>>>,
    penalizing: Vec<Arc<dyn PenalizingConstraint<S, D>>>,
}

impl<S: Solution, D> BasicProblem<S, D> {
    /// Creates a problem from an objective, its data and a random-solution
    /// factory. Constraints are added with the `with_*` methods.
    pub fn new(
        objective: impl Objective<S, D> + 'static,
        data: D,
        factory: impl Fn(&mut dyn RngCore, &D) -> S + Send + Sync + 'static,
    ) -> Self {
        BasicProblem {
            objective: Arc::new(objective),
            data,
            factory: Box::new(factory),
            mandatory: Vec::new(),
            penalizing: Vec::new(),
        }
    }

    /// Adds a mandatory constraint.
    pub fn with_constraint(mut self, constraint: impl Constraint<S, D> + 'static) -> Self {
        self.mandatory.push(Arc::new(constraint));
        self
    }

    /// Adds a penalizing constraint.
    pub fn with_penalizing_constraint(
        mut self,
        constraint: impl PenalizingConstraint<S, D> + 'static,
    ) -> Self {
        self.penalizing.push(Arc::new(constraint));
        self
    }

    /// The problem data.
    pub fn data(&self) -> &D {
        &self.data
    }

    /// The objective.
    pub fn objective(&self) -> &dyn Objective<S, D> {
        self.objective.as_ref()
    }

    /// The number of mandatory constraints.
    pub fn mandatory_constraint_count(&self) -> usize {
        self.mandatory.len()
    }

    /// The number of penalizing constraints.
    pub fn penalizing_constraint_count(&self) -> usize {
        self.penalizing.len()
    }

    /// All constraints (mandatory and penalizing) violated by the given
    /// solution.
    pub fn violated_constraints(&self, solution: &S) -> Vec<Arc<dyn Constraint<S, D>>> {
        let mandatory = self
            .mandatory
            .iter()
            .filter(|c| !c.validate(solution, &self.data).passed())
            .cloned();
        let penalizing = self
            .penalizing
            .iter()
            .filter(|c| !c.penalizing_validation(solution, &self.data).passed())
            .map(|c| -> Arc<dyn Constraint<S, D>> { c.clone() });
        mandatory.chain(penalizing).collect()
    }
}

impl<S: Solution, D: Send + Sync> Problem for BasicProblem<S, D> {
    type Solution = S;

    fn is_minimizing(&self) -> bool {
        self.objective.is_minimizing()
    }

    fn evaluate(&self, solution: &S) -> Box<dyn Evaluation> {
        let evaluation = self.objective.evaluate(solution, &self.data);
        if self.penalizing.is_empty() {
            return evaluation;
        }
        let mut penalized = PenalizedEvaluation::new(evaluation, self.is_minimizing());
        for constraint in &self.penalizing {
            penalized.add_penalizing_validation(
                constraint.penalizing_validation(solution, &self.data),
            );
        }
        Box::new(penalized)
    }

    fn validate(&self, solution: &S) -> Box<dyn Validation> {
        match self.mandatory.len() {
            0 => Box::new(SimpleValidation::PASSED),
            1 => self.mandatory[0].validate(solution, &self.data),
            _ => Box::new(CompositeValidation::new(
                self.mandatory
                    .iter()
                    .map(|c| c.validate(solution, &self.data))
                    .collect(),
            )),
        }
    }

    fn evaluate_move(
        &self,
        mv: &dyn Move<S>,
        solution: &S,
        current: &dyn Evaluation,
    ) -> Result<Box<dyn Evaluation>> {
        if self.penalizing.is_empty() {
            return self.objective.evaluate_move(mv, solution, current, &self.data);
        }
        let current = current
            .as_any()
            .downcast_ref::<PenalizedEvaluation>()
            .ok_or_else(|| {
                VicinityError::IncompatibleDeltaEvaluation(
                    "expected a penalized evaluation for a problem with penalizing constraints"
                        .into(),
                )
            })?;
        let inner = self
            .objective
            .evaluate_move(mv, solution, current.inner(), &self.data)?;
        let mut penalized = PenalizedEvaluation::new(inner, self.is_minimizing());
        for (index, constraint) in self.penalizing.iter().enumerate() {
            let previous = current.penalizing_validation(index).ok_or_else(|| {
                VicinityError::IncompatibleDeltaEvaluation(format!(
                    "current evaluation misses the validation of penalizing constraint {index}"
                ))
            })?;
            penalized.add_penalizing_validation(constraint.penalizing_validation_move(
                mv,
                solution,
                previous,
                &self.data,
            )?);
        }
        Ok(Box::new(penalized))
    }

    fn validate_move(
        &self,
        mv: &dyn Move<S>,
        solution: &S,
        current: &dyn Validation,
    ) -> Result<Box<dyn Validation>> {
        match self.mandatory.len() {
            0 => Ok(Box::new(SimpleValidation::PASSED)),
            1 => self.mandatory[0].validate_move(mv, solution, current, &self.data),
            n => {
                let current = current
                    .as_any()
                    .downcast_ref::<CompositeValidation>()
                    .filter(|c| c.len() == n)
                    .ok_or_else(|| {
                        VicinityError::IncompatibleDeltaValidation(
                            "expected a composite validation covering all mandatory constraints"
                                .into(),
                        )
                    })?;
                let mut validations = Vec::with_capacity(n);
                for (index, constraint) in self.mandatory.iter().enumerate() {
                    let previous = current.validation(index).ok_or_else(|| {
                        VicinityError::IncompatibleDeltaValidation(format!(
                            "current validation misses the outcome of constraint {index}"
                        ))
                    })?;
                    validations.push(constraint.validate_move(mv, solution, previous, &self.data)?);
                }
                Ok(Box::new(CompositeValidation::new(validations)))
            }
        }
    }

    fn random_solution(&self, rng: &mut dyn RngCore) -> S {
        (self.factory)(rng, &self.data)
    }
}

impl<S: Solution, D> fmt::Debug for BasicProblem<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicProblem")
            .field("objective", &self.objective)
            .field("mandatory_constraints", &self.mandatory.len())
            .field("penalizing_constraints", &self.penalizing.len())
            .finish()
    }
}
