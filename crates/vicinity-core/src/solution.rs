//! Solution marker trait.

use std::fmt::Debug;

/// A candidate point in the search space.
///
/// Deep copy is expressed through [`Clone`]: a clone must be observationally
/// independent from the original on any subsequent move. Searches hand out
/// solutions by clone and never share mutable access.
///
/// The trait is implemented automatically for every type satisfying the
/// bounds; plain data structs qualify without any extra code.
pub trait Solution: Clone + PartialEq + Debug + Send + 'static {}

impl<T> Solution for T where T: Clone + PartialEq + Debug + Send + 'static {}
