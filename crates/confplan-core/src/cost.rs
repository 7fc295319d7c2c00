//! Cost model
//!
//! Pure lookup tables: scenario → activation/deactivation cost and
//! quantity → observation cost. Missing ids cost zero; partial cost data is
//! the normal case, not an error.
//!
//! All sums saturate at `Cost::MAX` instead of overflowing.

use crate::store::Configuration;
use crate::types::{QuantityId, ScenarioId, ScenarioSet};
use std::collections::HashMap;

/// Unit of cost used throughout the engine
pub type Cost = u64;

/// Sum that clamps at `Cost::MAX`
#[inline]
pub(crate) fn saturating_sum(costs: impl IntoIterator<Item = Cost>) -> Cost {
    costs.into_iter().fold(0, Cost::saturating_add)
}

/// Immutable cost tables for one or more planning runs
///
/// Read-only once built; share it behind an `Arc` across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CostModel {
    scenarios: HashMap<ScenarioId, Cost>,
    observations: HashMap<QuantityId, Cost>,
}

impl CostModel {
    /// Create model with empty tables (every lookup costs zero)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create model from both tables
    #[must_use]
    pub fn from_tables(
        scenarios: impl IntoIterator<Item = (ScenarioId, Cost)>,
        observations: impl IntoIterator<Item = (QuantityId, Cost)>,
    ) -> Self {
        Self {
            scenarios: scenarios.into_iter().collect(),
            observations: observations.into_iter().collect(),
        }
    }

    /// With one scenario cost
    #[inline]
    #[must_use]
    pub fn with_scenario_cost(mut self, scenario: ScenarioId, cost: Cost) -> Self {
        self.scenarios.insert(scenario, cost);
        self
    }

    /// With one observation cost
    #[inline]
    #[must_use]
    pub fn with_observation_cost(mut self, quantity: QuantityId, cost: Cost) -> Self {
        self.observations.insert(quantity, cost);
        self
    }

    /// Cost of switching one scenario on or off
    #[inline]
    #[must_use]
    pub fn scenario_cost(&self, scenario: ScenarioId) -> Cost {
        self.scenarios.get(&scenario).copied().unwrap_or(0)
    }

    /// Cost of observing one quantity
    #[inline]
    #[must_use]
    pub fn observation_cost(&self, quantity: QuantityId) -> Cost {
        self.observations.get(&quantity).copied().unwrap_or(0)
    }

    /// Sum of scenario costs over a set
    #[must_use]
    pub fn scenario_set_cost(&self, scenarios: &ScenarioSet) -> Cost {
        saturating_sum(scenarios.iter().map(|s| self.scenario_cost(s)))
    }

    /// Cost of moving from `from` to `to`: retract what is no longer needed
    /// and apply what is newly needed.
    #[must_use]
    pub fn transition_cost(&self, from: &ScenarioSet, to: &ScenarioSet) -> Cost {
        let apply = to.iter().filter(|s| !from.contains(*s));
        let retract = from.iter().filter(|s| !to.contains(*s));
        saturating_sum(apply.chain(retract).map(|s| self.scenario_cost(s)))
    }

    /// Observation cost of a configuration: each of its quantities once
    #[must_use]
    pub fn configuration_observation_cost(&self, configuration: &Configuration) -> Cost {
        saturating_sum(configuration.quantity_ids().map(|q| self.observation_cost(q)))
    }

    /// Number of scenarios with an explicit cost
    #[inline]
    #[must_use]
    pub fn scenario_entries(&self) -> usize {
        self.scenarios.len()
    }

    /// Number of quantities with an explicit cost
    #[inline]
    #[must_use]
    pub fn observation_entries(&self) -> usize {
        self.observations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[u64]) -> ScenarioSet {
        ids.iter().copied().map(ScenarioId).collect()
    }

    fn model() -> CostModel {
        CostModel::new()
            .with_scenario_cost(ScenarioId(3), 5)
            .with_scenario_cost(ScenarioId(19), 7)
            .with_observation_cost(QuantityId(10), 2)
    }

    #[test]
    fn unknown_ids_cost_nothing() {
        let costs = model();
        assert_eq!(costs.scenario_cost(ScenarioId(999)), 0);
        assert_eq!(costs.observation_cost(QuantityId(999)), 0);
        assert_eq!(costs.scenario_set_cost(&set(&[3, 999])), 5);
    }

    #[test]
    fn transition_cost_is_symmetric_difference() {
        let costs = model();
        assert_eq!(costs.transition_cost(&set(&[3]), &set(&[3, 19])), 7);
        assert_eq!(costs.transition_cost(&set(&[3, 19]), &set(&[3])), 7);
        assert_eq!(costs.transition_cost(&set(&[3]), &set(&[19])), 12);
        assert_eq!(costs.transition_cost(&set(&[3, 19]), &ScenarioSet::new()), 12);
        assert_eq!(costs.transition_cost(&set(&[3]), &set(&[3])), 0);
    }

    #[test]
    fn from_tables_counts_entries() {
        let costs = CostModel::from_tables(
            [(ScenarioId(1), 1), (ScenarioId(2), 2)],
            [(QuantityId(5), 9)],
        );
        assert_eq!(costs.scenario_entries(), 2);
        assert_eq!(costs.observation_entries(), 1);
        assert_eq!(costs.observation_cost(QuantityId(5)), 9);
    }

    #[test]
    fn huge_costs_saturate() {
        let costs = CostModel::new()
            .with_scenario_cost(ScenarioId(1), Cost::MAX)
            .with_scenario_cost(ScenarioId(2), 1);
        assert_eq!(costs.scenario_set_cost(&set(&[1, 2])), Cost::MAX);
        assert_eq!(costs.transition_cost(&set(&[1]), &set(&[2])), Cost::MAX);
    }
}
