//! Search engine for the vicinity metaheuristic search framework.
//!
//! This crate drives local-search metaheuristics over problems defined with
//! `vicinity-core`:
//!
//! - [`Search`]: the lifecycle state machine shared by every algorithm,
//!   with listener dispatch and background stop-criterion polling
//! - [`SearchStrategy`]: the step-function seam implemented by the built-in
//!   algorithms ([`RandomDescent`], [`SteepestDescent`],
//!   [`VariableNeighborhoodDescent`], [`ReducedVariableNeighborhoodSearch`],
//!   [`VariableNeighborhoodSearch`])
//! - [`StopCriterion`]: runtime, step and improvement based termination
//! - [`SearchConfig`]: TOML-backed configuration
//!
//! Logging levels:
//! - **INFO**: search start/stop summaries
//! - **DEBUG**: best-solution improvements, stop-criterion firings
//! - **TRACE**: individual steps
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use vicinity_core::{
//!     Evaluation, Objective, SimpleEvaluation, SingleSwapNeighborhood, SubsetData,
//!     SubsetProblem, SubsetSolution,
//! };
//! use vicinity_solver::{MaxSteps, RandomDescent, Search};
//!
//! #[derive(Debug)]
//! struct Data(std::collections::BTreeSet<u32>);
//!
//! impl SubsetData for Data {
//!     fn ids(&self) -> &std::collections::BTreeSet<u32> {
//!         &self.0
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct SumOfIds;
//!
//! impl Objective<SubsetSolution, Data> for SumOfIds {
//!     fn evaluate(&self, solution: &SubsetSolution, _data: &Data) -> Box<dyn Evaluation> {
//!         let sum: u32 = solution.selected_ids().iter().sum();
//!         Box::new(SimpleEvaluation::of(sum as f64))
//!     }
//! }
//!
//! let problem = SubsetProblem::new(SumOfIds, Data((0..10).collect()), 3..=3);
//! let mut search = Search::new(
//!     problem,
//!     RandomDescent::new(Arc::new(SingleSwapNeighborhood::new())),
//! );
//! search.add_stop_criterion(MaxSteps::new(200));
//! search.start().unwrap();
//! assert!(search.best_solution().is_some());
//! ```

pub mod config;
pub mod event;
pub mod search;
pub mod state;
pub mod status;
pub mod stop;
pub mod strategy;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{ConfigError, SearchConfig, TerminationConfig};
pub use event::{
    CountingSearchListener, LoggingSearchListener, SearchEventSupport, SearchListener,
};
pub use search::{
    CurrentSolution, LocalSearch, MoveOutcome, Search, SearchContext, SearchStrategy,
};
pub use state::{BestSolution, SearchHandle};
pub use status::SearchStatus;
pub use stop::{
    AndStopCriterion, MaxRuntime, MaxSteps, MaxStepsWithoutImprovement,
    MaxTimeWithoutImprovement, MinDelta, OrStopCriterion, StopCriterion, TargetValue,
};
pub use strategy::{
    RandomDescent, ReducedVariableNeighborhoodSearch, SteepestDescent,
    VariableNeighborhoodDescent, VariableNeighborhoodSearch,
};
