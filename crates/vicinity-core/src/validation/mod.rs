//! Validation values produced by constraints.

mod composite;
mod penalizing;
mod simple;
mod subset;

pub use composite::CompositeValidation;
pub use penalizing::PenalizingValidation;
pub use simple::SimpleValidation;
pub use subset::SubsetValidation;

use std::any::Any;
use std::fmt::{Debug, Display};

/// A boolean pass/fail outcome of checking a solution against constraints.
///
/// Like evaluations, constraints may define their own validation types
/// carrying extra state for O(1) delta validation.
pub trait Validation: Debug + Display + Send + Sync {
    /// Returns `true` if the solution passed validation.
    fn passed(&self) -> bool;

    /// Returns `self` as [`Any`] so that delta implementations can downcast
    /// to the concrete validation type they produced.
    fn as_any(&self) -> &dyn Any;

    /// Clones this validation into a boxed trait object.
    fn clone_boxed(&self) -> Box<dyn Validation>;
}

impl Clone for Box<dyn Validation> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}
