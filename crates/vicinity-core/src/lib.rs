//! Problem model for the vicinity metaheuristic search framework.
//!
//! This crate defines the data contract between user problems and the search
//! engine in `vicinity-solver`:
//!
//! - [`Solution`], [`Move`] and [`Neighborhood`]: the search space and the
//!   perturbations that explore it
//! - [`Evaluation`] and [`Validation`]: the numeric and boolean outcomes of
//!   scoring and checking a solution, including penalized composition
//! - [`Objective`], [`Constraint`] and [`PenalizingConstraint`]: user-defined
//!   scoring and feasibility rules, with optional delta (incremental) forms
//! - [`Problem`]: the composition of all of the above, implemented by
//!   [`BasicProblem`] for arbitrary solution types and by [`SubsetProblem`]
//!   for the built-in subset selection domain

pub mod error;
pub mod eval;
pub mod neigh;
pub mod problem;
pub mod solution;
pub mod subset;
pub mod validation;

pub use error::{Result, VicinityError};
pub use eval::{Evaluation, PenalizedEvaluation, SimpleEvaluation};
pub use neigh::{Move, Neighborhood};
pub use problem::{BasicProblem, Constraint, Objective, PenalizingConstraint, Problem};
pub use solution::Solution;
pub use subset::{
    DisjointMultiSwapNeighborhood, SingleAdditionNeighborhood, SingleDeletionNeighborhood,
    SingleSwapNeighborhood, SubsetData, SubsetMove, SubsetProblem, SubsetSolution,
};
pub use validation::{
    CompositeValidation, PenalizingValidation, SimpleValidation, SubsetValidation, Validation,
};
