//! Penalized evaluation composition.

use std::any::Any;
use std::fmt;

use parking_lot::Mutex;

use super::Evaluation;
use crate::validation::{PenalizingValidation, Validation};

/// An evaluation composed of an inner evaluation and the penalizing
/// validations of a problem's penalizing constraints.
///
/// The final value adds the penalty sum to the inner value when minimizing
/// and subtracts it when maximizing, so that a penalty always makes a
/// solution worse. Penalties are stored in registration order of the
/// penalizing constraints; the registration index doubles as the lookup key.
///
/// The combined value is computed lazily and cached; every mutation of the
/// penalty list invalidates the cache.
#[derive(Debug)]
pub struct PenalizedEvaluation {
    inner: Box<dyn Evaluation>,
    penalties: Vec<PenalizingValidation>,
    minimizing: bool,
    cached: Mutex<Option<f64>>,
}

impl PenalizedEvaluation {
    /// Creates a penalized evaluation around the given inner evaluation.
    /// Penalties are added afterwards with
    /// [`add_penalizing_validation`](Self::add_penalizing_validation).
    pub fn new(inner: Box<dyn Evaluation>, minimizing: bool) -> Self {
        PenalizedEvaluation {
            inner,
            // most problems carry a single penalizing constraint
            penalties: Vec::with_capacity(1),
            minimizing,
            cached: Mutex::new(None),
        }
    }

    /// Appends a penalizing validation, keyed by its position.
    pub fn add_penalizing_validation(&mut self, validation: PenalizingValidation) {
        self.penalties.push(validation);
        *self.cached.lock() = None;
    }

    /// Retrieves the penalizing validation registered at the given index.
    pub fn penalizing_validation(&self, index: usize) -> Option<&PenalizingValidation> {
        self.penalties.get(index)
    }

    /// All penalizing validations, in registration order.
    pub fn penalizing_validations(&self) -> &[PenalizingValidation] {
        &self.penalties
    }

    /// The original, unpenalized evaluation.
    pub fn inner(&self) -> &dyn Evaluation {
        self.inner.as_ref()
    }

    /// Whether penalties are added (minimizing) or subtracted (maximizing).
    pub fn is_minimizing(&self) -> bool {
        self.minimizing
    }
}

impl Clone for PenalizedEvaluation {
    fn clone(&self) -> Self {
        PenalizedEvaluation {
            inner: self.inner.clone(),
            penalties: self.penalties.clone(),
            minimizing: self.minimizing,
            cached: Mutex::new(*self.cached.lock()),
        }
    }
}

impl Evaluation for PenalizedEvaluation {
    fn value(&self) -> f64 {
        let mut cached = self.cached.lock();
        *cached.get_or_insert_with(|| {
            let penalty: f64 = self.penalties.iter().map(|p| p.penalty()).sum();
            let inner = self.inner.value();
            if self.minimizing {
                inner + penalty
            } else {
                inner - penalty
            }
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn Evaluation> {
        Box::new(self.clone())
    }
}

impl fmt::Display for PenalizedEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.penalties.iter().all(|p| p.passed()) {
            write!(f, "{}", self.value())
        } else {
            write!(f, "{} (unpenalized: {})", self.value(), self.inner.value())
        }
    }
}
