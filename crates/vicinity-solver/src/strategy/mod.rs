//! Search strategies: the step functions of the built-in algorithms.

mod random_descent;
mod rvns;
mod steepest_descent;
mod vnd;
mod vns;

pub use random_descent::RandomDescent;
pub use rvns::ReducedVariableNeighborhoodSearch;
pub use steepest_descent::SteepestDescent;
pub use vnd::VariableNeighborhoodDescent;
pub use vns::{LocalSearchFactory, VariableNeighborhoodSearch};
