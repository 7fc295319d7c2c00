//! Plan summary and cost report documents

use confplan_core::{
    toggle_counts, Cost, CostMode, CostReporter, CostSummary, ScenarioId, Sequence, StepCost,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Totals of one ordering over the full idle → … → idle cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummaryDocument {
    /// Relative combined cost including the closing retract
    pub reconfiguration_cost: Cost,
    /// Observation cost of every configuration, once each
    pub observation_cost: Cost,
    /// Cost of returning to idle
    pub closing_retract_cost: Cost,
    /// Sum of apply costs
    pub apply_cost: Cost,
    /// Sum of retract costs, closing retract included
    pub retract_cost: Cost,
}

impl PlanSummaryDocument {
    /// Summarise a sequence
    ///
    /// Always relative with the closing retract counted, whatever the
    /// reporter's own setting.
    #[must_use]
    pub fn from_sequence(reporter: &CostReporter<'_>, sequence: &Sequence) -> Self {
        let summary = reporter
            .with_closing_retract(true)
            .summary(sequence, CostMode::Relative);
        Self {
            reconfiguration_cost: summary.combined_cost,
            observation_cost: summary.observation_cost,
            closing_retract_cost: summary.closing_retract_cost,
            apply_cost: summary.apply_cost,
            retract_cost: summary.retract_cost,
        }
    }
}

/// Full cost breakdown of one ordering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostReportDocument {
    /// Totals in the requested mode
    pub summary: CostSummary,
    /// Per-position costs in execution order
    pub steps: Vec<StepCost>,
    /// On/off changes per scenario
    pub toggles: BTreeMap<ScenarioId, usize>,
}

impl CostReportDocument {
    /// Report a sequence in `mode`
    #[must_use]
    pub fn new(reporter: &CostReporter<'_>, sequence: &Sequence, mode: CostMode) -> Self {
        Self {
            summary: reporter.summary(sequence, mode),
            steps: reporter.steps(sequence, mode),
            toggles: toggle_counts(sequence),
        }
    }
}
