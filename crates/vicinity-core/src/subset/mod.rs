//! Subset selection domain: the canonical solution type and its
//! neighborhoods.
//!
//! A subset solution partitions a fixed universe of integer IDs into a
//! selected and an unselected set. Moves select, deselect or swap IDs;
//! neighborhoods generate them, optionally keeping a set of fixed IDs
//! untouched.

mod moves;
mod neigh;
mod problem;
mod solution;

pub use moves::SubsetMove;
pub use neigh::{
    DisjointMultiSwapNeighborhood, SingleAdditionNeighborhood, SingleDeletionNeighborhood,
    SingleSwapNeighborhood,
};
pub use problem::{SubsetData, SubsetProblem};
pub use solution::SubsetSolution;
