//! confplan Core
//!
//! Test configuration planning engine.
//!
//! # Core Concepts
//!
//! - [`aggregate`]: group requirement records by exact scenario set
//! - [`close`]: propagate obligations from every scenario subset to its supersets
//! - [`ConfigurationStore`]: immutable, id-stable configurations
//! - [`Sequence`]: an ordering with per-position apply/retract [`Delta`]s
//! - [`Sequencer`]: [`BaselineSequencer`] and the [`GreedySequencer`] heuristic
//! - [`CostReporter`]: absolute vs relative cost accounting
//!
//! # Example
//!
//! ```rust,ignore
//! use confplan_core::{CostModel, Planner, RequirementRecord};
//! use std::sync::Arc;
//!
//! let costs = Arc::new(CostModel::new().with_scenario_cost(ScenarioId(3), 5));
//! let run = Planner::new(costs).plan(&records)?;
//!
//! println!("saved {}", run.comparison().combined_savings());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod aggregate;
mod closure;
mod config;
mod cost;
mod delta;
mod error;
mod planner;
mod report;
mod sequencer;
mod store;
mod types;

// Re-exports
pub use aggregate::{aggregate, Aggregation, Requirement, RequirementRecord};
pub use closure::{close, close_store};
pub use config::PlannerConfig;
pub use cost::{Cost, CostModel};
pub use delta::{Delta, Sequence, SequenceStep};
pub use error::{MalformedReason, ParseOptionError, PlanError, PlanResult};
pub use planner::{PlanRun, Planner};
pub use report::{toggle_counts, CostComparison, CostMode, CostReporter, CostSummary, StepCost};
pub use sequencer::{BaselineSequencer, GreedySequencer, Sequencer, SequencerKind};
pub use store::{Configuration, ConfigurationStore, Obligations};
pub use types::{ConfigurationId, QuantityId, RequirementId, ScenarioId, ScenarioSet};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
