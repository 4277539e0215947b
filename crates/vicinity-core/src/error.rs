//! Error types for vicinity.

use thiserror::Error;

/// Main error type for vicinity operations.
///
/// Programmer errors (empty neighborhood lists, invalid size bounds,
/// sub-millisecond check periods, ...) are not represented here: they panic
/// at construction time. `VicinityError` covers failures that can occur
/// while a search is running.
#[derive(Debug, Error)]
pub enum VicinityError {
    /// An illegal operation was attempted on a solution, e.g. deselecting an
    /// ID that is not currently selected.
    #[error("illegal solution modification: {0}")]
    SolutionModification(String),

    /// A delta evaluator received a move it cannot process.
    ///
    /// Calling code may retry with a full evaluation of the modified solution.
    #[error("incompatible delta evaluation: {0}")]
    IncompatibleDeltaEvaluation(String),

    /// A delta validator received a move it cannot process.
    #[error("incompatible delta validation: {0}")]
    IncompatibleDeltaValidation(String),

    /// Invalid operation for the current search state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Internal error (should not occur in normal operation).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for vicinity operations.
pub type Result<T> = std::result::Result<T, VicinityError>;
