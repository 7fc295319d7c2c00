//! Planner configuration

use crate::report::CostMode;
use crate::sequencer::SequencerKind;
use serde::{Deserialize, Serialize};

/// Planner configuration
///
/// Every field has a default so a partial TOML file is enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Accounting mode for summaries
    pub cost_mode: CostMode,
    /// Ordering used for the optimized plan
    pub sequencer: SequencerKind,
    /// Count the closing retract in relative totals
    pub include_closing_retract: bool,
}

impl PlannerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With cost mode
    #[inline]
    #[must_use]
    pub fn with_cost_mode(mut self, mode: CostMode) -> Self {
        self.cost_mode = mode;
        self
    }

    /// With sequencer
    #[inline]
    #[must_use]
    pub fn with_sequencer(mut self, sequencer: SequencerKind) -> Self {
        self.sequencer = sequencer;
        self
    }

    /// With closing retract accounting
    #[inline]
    #[must_use]
    pub fn with_closing_retract(mut self, include: bool) -> Self {
        self.include_closing_retract = include;
        self
    }

    /// Parse from TOML
    ///
    /// # Errors
    /// Returns error on malformed TOML or unknown enum values
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            cost_mode: CostMode::Relative,
            sequencer: SequencerKind::Greedy,
            include_closing_retract: true,
        }
    }
}
