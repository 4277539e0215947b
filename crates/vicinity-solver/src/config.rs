//! TOML-backed search configuration.
//!
//! Load seed, polling period and stop criteria from a TOML file to control
//! a search without code changes.
//!
//! # Examples
//!
//! ```
//! use vicinity_solver::SearchConfig;
//! use std::time::Duration;
//!
//! let config = SearchConfig::from_toml_str(
//!     r#"
//!     seed = 42
//!     stop_check_period_ms = 50
//!
//!     [termination]
//!     max_runtime_ms = 30000
//!     max_steps_without_improvement = 500
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.seed, Some(42));
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! ```
//!
//! Use the defaults when the file is missing:
//!
//! ```
//! use vicinity_solver::SearchConfig;
//!
//! let config = SearchConfig::load("search.toml").unwrap_or_default();
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vicinity_core::Solution;

use crate::stop::{
    MaxRuntime, MaxSteps, MaxStepsWithoutImprovement, MaxTimeWithoutImprovement, MinDelta,
    StopCriterion, TargetValue,
};

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the configuration.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Search configuration, applied with
/// [`Search::configure`](crate::Search::configure).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    /// RNG seed making runs reproducible.
    pub seed: Option<u64>,

    /// Polling period of the stop-criterion checker, in milliseconds.
    pub stop_check_period_ms: Option<u64>,

    /// Configured stop criteria.
    #[serde(default)]
    pub termination: TerminationConfig,
}

impl SearchConfig {
    /// Parses a configuration from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Loads a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        SearchConfig::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// The configured polling period.
    pub fn stop_check_period(&self) -> Option<Duration> {
        self.stop_check_period_ms.map(Duration::from_millis)
    }

    /// The configured runtime limit.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.max_runtime_ms.map(Duration::from_millis)
    }
}

/// The `[termination]` table: each present entry becomes a stop criterion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerminationConfig {
    /// Maximum runtime in milliseconds.
    pub max_runtime_ms: Option<u64>,

    /// Maximum number of steps.
    pub max_steps: Option<u64>,

    /// Maximum number of steps without improving the best solution.
    pub max_steps_without_improvement: Option<u64>,

    /// Maximum time without improving the best solution, in milliseconds.
    pub max_time_without_improvement_ms: Option<u64>,

    /// Minimum magnitude of the last best-solution improvement.
    pub min_delta: Option<f64>,

    /// Best evaluation value at which the search stops.
    pub target_value: Option<f64>,
}

impl TerminationConfig {
    /// Builds the configured stop criteria, in field order.
    pub fn build<S: Solution>(&self) -> Vec<Arc<dyn StopCriterion<S>>> {
        let mut criteria: Vec<Arc<dyn StopCriterion<S>>> = Vec::new();
        if let Some(millis) = self.max_runtime_ms {
            criteria.push(Arc::new(MaxRuntime::millis(millis)));
        }
        if let Some(steps) = self.max_steps {
            criteria.push(Arc::new(MaxSteps::new(steps)));
        }
        if let Some(steps) = self.max_steps_without_improvement {
            criteria.push(Arc::new(MaxStepsWithoutImprovement::new(steps)));
        }
        if let Some(millis) = self.max_time_without_improvement_ms {
            criteria.push(Arc::new(MaxTimeWithoutImprovement::millis(millis)));
        }
        if let Some(delta) = self.min_delta {
            criteria.push(Arc::new(MinDelta::new(delta)));
        }
        if let Some(target) = self.target_value {
            criteria.push(Arc::new(TargetValue::new(target)));
        }
        criteria
    }
}
