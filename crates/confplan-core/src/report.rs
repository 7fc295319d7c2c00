//! Cost reporting
//!
//! Aggregates apply/retract/combined and observation costs for a sequence in
//! one of two accounting modes:
//! - [`CostMode::Absolute`]: every configuration realised from idle in
//!   isolation (apply = all its scenarios, retract = nothing)
//! - [`CostMode::Relative`]: the actual transition from the preceding
//!   position, plus the closing retract back to idle in the totals
//!
//! The two modes produce different totals and are never mixed. Totals
//! saturate at `Cost::MAX`.

use crate::cost::{saturating_sum, Cost, CostModel};
use crate::delta::{Delta, Sequence, SequenceStep};
use crate::error::ParseOptionError;
use crate::types::{ConfigurationId, ScenarioId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cost accounting mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostMode {
    /// Each configuration in isolation from idle
    Absolute,
    /// Execution order transitions
    #[default]
    Relative,
}

impl std::fmt::Display for CostMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absolute => write!(f, "absolute"),
            Self::Relative => write!(f, "relative"),
        }
    }
}

impl std::str::FromStr for CostMode {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "absolute" => Ok(Self::Absolute),
            "relative" => Ok(Self::Relative),
            other => Err(ParseOptionError::UnknownCostMode(other.to_string())),
        }
    }
}

/// Costs of one position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCost {
    /// 0-based execution position
    pub position: usize,
    /// Configuration at this position
    pub configuration: ConfigurationId,
    /// Cost of applied scenarios
    pub apply: Cost,
    /// Cost of retracted scenarios
    pub retract: Cost,
    /// `apply + retract`
    pub combined: Cost,
    /// Observation cost of the configuration
    pub observation: Cost,
    /// Running sum of `combined` up to and including this position
    pub cumulative: Cost,
}

/// Whole-sequence totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostSummary {
    /// Accounting mode used
    pub mode: CostMode,
    /// Number of configurations
    pub configurations: usize,
    /// Sum of apply costs
    pub apply_cost: Cost,
    /// Sum of retract costs, including the closing retract when counted
    pub retract_cost: Cost,
    /// Cost of returning to idle after the last position
    pub closing_retract_cost: Cost,
    /// `apply_cost + retract_cost`
    pub combined_cost: Cost,
    /// Every configuration's observation cost, once each
    pub observation_cost: Cost,
}

/// Baseline against optimized totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostComparison {
    /// Store-order totals
    pub baseline: CostSummary,
    /// Sequencer-order totals
    pub optimized: CostSummary,
}

impl CostComparison {
    /// Combined cost saved by the optimized order (negative if it is worse)
    #[inline]
    #[must_use]
    pub fn combined_savings(&self) -> i128 {
        i128::from(self.baseline.combined_cost) - i128::from(self.optimized.combined_cost)
    }
}

/// Computes cost figures for sequences against one cost model
#[derive(Debug, Clone, Copy)]
pub struct CostReporter<'a> {
    costs: &'a CostModel,
    include_closing_retract: bool,
}

impl<'a> CostReporter<'a> {
    /// Create reporter; relative totals include the closing retract
    #[inline]
    #[must_use]
    pub fn new(costs: &'a CostModel) -> Self {
        Self {
            costs,
            include_closing_retract: true,
        }
    }

    /// Whether relative totals count the closing retract
    ///
    /// The closing retract cost is reported separately either way.
    #[inline]
    #[must_use]
    pub fn with_closing_retract(mut self, include: bool) -> Self {
        self.include_closing_retract = include;
        self
    }

    fn effective_delta(step: &SequenceStep, mode: CostMode) -> Delta {
        match mode {
            CostMode::Absolute => Delta::from_empty(step.configuration().scenarios()),
            CostMode::Relative => step.delta().clone(),
        }
    }

    /// Per-position costs in execution order
    #[must_use]
    pub fn steps(&self, sequence: &Sequence, mode: CostMode) -> Vec<StepCost> {
        let mut cumulative: Cost = 0;
        sequence
            .steps()
            .iter()
            .enumerate()
            .map(|(position, step)| {
                let delta = Self::effective_delta(step, mode);
                let apply = self.costs.scenario_set_cost(delta.apply());
                let retract = self.costs.scenario_set_cost(delta.retract());
                let combined = apply.saturating_add(retract);
                cumulative = cumulative.saturating_add(combined);
                StepCost {
                    position,
                    configuration: step.configuration().id(),
                    apply,
                    retract,
                    combined,
                    observation: self
                        .costs
                        .configuration_observation_cost(step.configuration()),
                    cumulative,
                }
            })
            .collect()
    }

    /// Per-position costs sorted by ascending combined cost
    ///
    /// Equal costs keep execution order. `cumulative` still refers to
    /// execution order.
    #[must_use]
    pub fn steps_by_cost(&self, sequence: &Sequence, mode: CostMode) -> Vec<StepCost> {
        let mut steps = self.steps(sequence, mode);
        steps.sort_by_key(|s| s.combined);
        steps
    }

    /// Whole-sequence totals
    #[must_use]
    pub fn summary(&self, sequence: &Sequence, mode: CostMode) -> CostSummary {
        let steps = self.steps(sequence, mode);
        let apply_cost = saturating_sum(steps.iter().map(|s| s.apply));
        let step_retract = saturating_sum(steps.iter().map(|s| s.retract));
        let observation_cost = saturating_sum(steps.iter().map(|s| s.observation));

        let closing_retract_cost = match mode {
            CostMode::Absolute => 0,
            CostMode::Relative => self.costs.scenario_set_cost(&sequence.closing_retract()),
        };
        let retract_cost = if self.include_closing_retract {
            step_retract.saturating_add(closing_retract_cost)
        } else {
            step_retract
        };

        CostSummary {
            mode,
            configurations: sequence.len(),
            apply_cost,
            retract_cost,
            closing_retract_cost,
            combined_cost: apply_cost.saturating_add(retract_cost),
            observation_cost,
        }
    }

    /// Totals for a baseline and an optimized ordering
    #[must_use]
    pub fn compare(
        &self,
        baseline: &Sequence,
        optimized: &Sequence,
        mode: CostMode,
    ) -> CostComparison {
        CostComparison {
            baseline: self.summary(baseline, mode),
            optimized: self.summary(optimized, mode),
        }
    }
}

/// How often each scenario is switched on or off along idle → … → idle
#[must_use]
pub fn toggle_counts(sequence: &Sequence) -> BTreeMap<ScenarioId, usize> {
    let mut counts: BTreeMap<ScenarioId, usize> = BTreeMap::new();
    for step in sequence.steps() {
        let delta = step.delta();
        for scenario in delta.apply().iter().chain(delta.retract().iter()) {
            *counts.entry(scenario).or_default() += 1;
        }
    }
    for scenario in sequence.closing_retract().iter() {
        *counts.entry(scenario).or_default() += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Configuration, Obligations};
    use crate::types::{QuantityId, RequirementId, ScenarioSet};
    use std::sync::Arc;

    fn set(ids: &[u64]) -> ScenarioSet {
        ids.iter().copied().map(ScenarioId).collect()
    }

    fn config(id: u64, scenarios: &[u64], quantities: &[u64]) -> Arc<Configuration> {
        let obligations: Obligations = quantities
            .iter()
            .map(|q| (QuantityId(*q), RequirementId(1)))
            .collect();
        Arc::new(Configuration::new(ConfigurationId(id), set(scenarios), obligations))
    }

    fn costs() -> CostModel {
        CostModel::new()
            .with_scenario_cost(ScenarioId(3), 5)
            .with_scenario_cost(ScenarioId(19), 7)
            .with_observation_cost(QuantityId(10), 2)
            .with_observation_cost(QuantityId(11), 4)
    }

    fn example() -> Sequence {
        Sequence::from_order(vec![config(1, &[3], &[10]), config(2, &[3, 19], &[10, 11])])
    }

    #[test]
    fn relative_steps_and_closing_retract() {
        let costs = costs();
        let reporter = CostReporter::new(&costs);
        let steps = reporter.steps(&example(), CostMode::Relative);

        assert_eq!(steps[1].apply, 7);
        assert_eq!(steps[1].retract, 0);
        assert_eq!(steps[1].cumulative, 12);

        let summary = reporter.summary(&example(), CostMode::Relative);
        assert_eq!(summary.apply_cost, 12);
        assert_eq!(summary.closing_retract_cost, 12);
        assert_eq!(summary.retract_cost, 12);
        assert_eq!(summary.combined_cost, 24);
        assert_eq!(summary.observation_cost, 2 + 6);
    }

    #[test]
    fn absolute_mode_realises_each_from_idle() {
        let costs = costs();
        let summary = CostReporter::new(&costs).summary(&example(), CostMode::Absolute);
        assert_eq!(summary.apply_cost, 5 + 12);
        assert_eq!(summary.retract_cost, 0);
        assert_eq!(summary.closing_retract_cost, 0);
        assert_eq!(summary.combined_cost, 17);
    }

    #[test]
    fn closing_retract_can_be_excluded_from_totals() {
        let costs = costs();
        let summary = CostReporter::new(&costs)
            .with_closing_retract(false)
            .summary(&example(), CostMode::Relative);
        assert_eq!(summary.retract_cost, 0);
        assert_eq!(summary.closing_retract_cost, 12);
        assert_eq!(summary.combined_cost, 12);
    }

    #[test]
    fn empty_sequence_reports_zero() {
        let costs = costs();
        let summary = CostReporter::new(&costs).summary(&Sequence::default(), CostMode::Relative);
        assert_eq!(summary, CostSummary::default());
    }

    #[test]
    fn steps_by_cost_is_stable() {
        let costs = costs();
        let seq = Sequence::from_order(vec![
            config(1, &[19], &[]),
            config(2, &[3], &[]),
            config(3, &[3, 99], &[]),
        ]);
        let sorted = CostReporter::new(&costs).steps_by_cost(&seq, CostMode::Absolute);
        let order: Vec<u64> = sorted.iter().map(|s| s.configuration.0).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn comparison_savings() {
        let costs = costs();
        let worse = Sequence::from_order(vec![
            config(1, &[3], &[]),
            config(2, &[19], &[]),
            config(3, &[3], &[]),
        ]);
        let better = Sequence::from_order(vec![
            config(1, &[3], &[]),
            config(3, &[3], &[]),
            config(2, &[19], &[]),
        ]);
        let cmp = CostReporter::new(&costs).compare(&worse, &better, CostMode::Relative);
        assert_eq!(cmp.baseline.combined_cost, 5 + 12 + 12 + 5);
        assert_eq!(cmp.optimized.combined_cost, 5 + 0 + 12 + 7);
        assert_eq!(cmp.combined_savings(), 10);
    }

    #[test]
    fn totals_saturate_instead_of_overflowing() {
        let costs = CostModel::new()
            .with_scenario_cost(ScenarioId(3), Cost::MAX)
            .with_scenario_cost(ScenarioId(19), 7);
        let steps = CostReporter::new(&costs).steps(&example(), CostMode::Relative);
        assert_eq!(steps[1].cumulative, Cost::MAX);

        let summary = CostReporter::new(&costs).summary(&example(), CostMode::Relative);
        assert_eq!(summary.apply_cost, Cost::MAX);
        assert_eq!(summary.closing_retract_cost, Cost::MAX);
        assert_eq!(summary.combined_cost, Cost::MAX);
    }

    #[test]
    fn toggle_counts_include_closing() {
        let counts = toggle_counts(&example());
        assert_eq!(counts.get(&ScenarioId(3)), Some(&2));
        assert_eq!(counts.get(&ScenarioId(19)), Some(&2));
    }

    #[test]
    fn mode_parses() {
        assert_eq!("ABSOLUTE".parse::<CostMode>(), Ok(CostMode::Absolute));
        assert_eq!(
            "cycle".parse::<CostMode>(),
            Err(ParseOptionError::UnknownCostMode("cycle".into()))
        );
        assert_eq!(CostMode::default().to_string(), "relative");
    }
}
