//! Testing utilities for confplan workspace
//!
//! Shared test helpers, fixtures, and assertions.

#![allow(missing_docs)]

use confplan_core::{
    ConfigurationStore, CostModel, Planner, QuantityId, RequirementId, RequirementRecord,
    ScenarioId, ScenarioSet, Sequence,
};

pub fn scenario_set(ids: &[u64]) -> ScenarioSet {
    ids.iter().copied().map(ScenarioId).collect()
}

pub fn requirement(id: u64, scenarios: &[u64], quantity: u64) -> RequirementRecord {
    RequirementRecord::new(
        RequirementId(id),
        scenarios.iter().copied().map(ScenarioId),
        QuantityId(quantity),
    )
}

/// Two requirements where `{3} ⊆ {3,19}`
pub fn worked_example_requirements() -> Vec<RequirementRecord> {
    vec![requirement(1, &[3], 10), requirement(2, &[3, 19], 11)]
}

/// Scenario costs `{3: 5, 19: 7}`
pub fn worked_example_costs() -> CostModel {
    CostModel::new()
        .with_scenario_cost(ScenarioId(3), 5)
        .with_scenario_cost(ScenarioId(19), 7)
}

/// A small lattice with overlapping sets, disjoint sets and mixed costs
pub fn lattice_requirements() -> Vec<RequirementRecord> {
    vec![
        requirement(1, &[1], 100),
        requirement(2, &[1, 2], 101),
        requirement(3, &[2, 3], 102),
        requirement(4, &[1, 2, 3], 100),
        requirement(5, &[4], 103),
        requirement(6, &[2], 104),
        requirement(7, &[1, 2], 104),
        requirement(8, &[3, 4], 101),
    ]
}

pub fn lattice_costs() -> CostModel {
    CostModel::new()
        .with_scenario_cost(ScenarioId(1), 8)
        .with_scenario_cost(ScenarioId(2), 3)
        .with_scenario_cost(ScenarioId(3), 5)
        .with_scenario_cost(ScenarioId(4), 1)
        .with_observation_cost(QuantityId(100), 2)
        .with_observation_cost(QuantityId(101), 1)
}

pub fn build_store(records: &[RequirementRecord]) -> ConfigurationStore {
    Planner::build_store(records).unwrap()
}

/// Ids of a sequence as plain integers
pub fn sequence_ids(sequence: &Sequence) -> Vec<u64> {
    sequence.ids().into_iter().map(|id| id.0).collect()
}
