use confplan_core::{
    BaselineSequencer, Configuration, ConfigurationId, ConfigurationStore, CostMode, CostModel,
    CostReporter, GreedySequencer, Obligations, ScenarioId, ScenarioSet, Sequence, Sequencer,
};
use confplan_test_utils::{
    build_store, lattice_costs, lattice_requirements, scenario_set, sequence_ids,
};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

fn store_strategy() -> impl Strategy<Value = ConfigurationStore> {
    proptest::collection::btree_set(proptest::collection::btree_set(0..10u64, 1..5), 0..16)
        .prop_map(|sets| {
            ConfigurationStore::new(
                sets.into_iter()
                    .enumerate()
                    .map(|(idx, s)| {
                        Configuration::new(
                            ConfigurationId(idx as u64 + 1),
                            s.into_iter().map(ScenarioId).collect(),
                            Obligations::new(),
                        )
                    })
                    .collect(),
            )
        })
}

fn costs_strategy() -> impl Strategy<Value = CostModel> {
    // Small cost range so ties are common.
    proptest::collection::vec(0..4u64, 10).prop_map(|costs| {
        CostModel::from_tables(
            costs.into_iter().enumerate().map(|(i, c)| (ScenarioId(i as u64), c)),
            std::iter::empty(),
        )
    })
}

fn assert_delta_invariants(sequence: &Sequence) -> Result<(), TestCaseError> {
    let mut previous = ScenarioSet::new();
    for step in sequence.steps() {
        let delta = step.delta();
        prop_assert!(!delta.apply().intersects(delta.retract()));
        let rebuilt = previous.difference(delta.retract()).union(delta.apply());
        prop_assert_eq!(&rebuilt, step.configuration().scenarios());
        previous = step.configuration().scenarios().clone();
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_greedy_choice_is_locally_minimal(store in store_strategy(), costs in costs_strategy()) {
        let sequence = GreedySequencer::new().sequence(&store, &costs);
        prop_assert_eq!(sequence.len(), store.len());

        let mut placed: BTreeSet<ConfigurationId> = BTreeSet::new();
        let mut current = ScenarioSet::new();
        for step in sequence.steps() {
            let chosen = step.configuration();
            let chosen_cost = costs.transition_cost(&current, chosen.scenarios());
            for other in store.iter().filter(|c| !placed.contains(&c.id()) && c.id() != chosen.id()) {
                let other_cost = costs.transition_cost(&current, other.scenarios());
                prop_assert!(chosen_cost <= other_cost);
                // First minimum in enumeration order wins.
                if other_cost == chosen_cost {
                    prop_assert!(other.id() > chosen.id());
                }
            }
            placed.insert(chosen.id());
            current = chosen.scenarios().clone();
        }
    }

    #[test]
    fn prop_greedy_is_a_permutation(store in store_strategy(), costs in costs_strategy()) {
        let sequence = GreedySequencer::new().sequence(&store, &costs);
        let mut ids = sequence.ids();
        ids.sort();
        let expected: Vec<_> = store.iter().map(|c| c.id()).collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn prop_deltas_are_consistent(
        store in store_strategy(),
        costs in costs_strategy(),
    ) {
        assert_delta_invariants(&BaselineSequencer::new().sequence(&store, &costs))?;
        assert_delta_invariants(&GreedySequencer::new().sequence(&store, &costs))?;
    }

    #[test]
    fn prop_relative_total_is_sum_of_transitions(store in store_strategy(), costs in costs_strategy()) {
        let sequence = GreedySequencer::new().sequence(&store, &costs);
        let summary = CostReporter::new(&costs).summary(&sequence, CostMode::Relative);

        let mut expected = 0;
        let mut current = ScenarioSet::new();
        for config in sequence.configurations() {
            expected += costs.transition_cost(&current, config.scenarios());
            current = config.scenarios().clone();
        }
        expected += costs.transition_cost(&current, &ScenarioSet::new());

        prop_assert_eq!(summary.combined_cost, expected);
        prop_assert_eq!(summary.combined_cost, summary.apply_cost + summary.retract_cost);
    }

    #[test]
    fn prop_sequencing_does_not_mutate_store(store in store_strategy(), costs in costs_strategy()) {
        let before: Vec<Configuration> = store.iter().map(|c| (**c).clone()).collect();
        let _ = GreedySequencer::new().sequence(&store, &costs);
        let after: Vec<Configuration> = store.iter().map(|c| (**c).clone()).collect();
        prop_assert_eq!(before, after);
    }
}

#[test]
fn greedy_order_on_lattice() {
    let store = build_store(&lattice_requirements());
    // Enumeration: #1 {1}, #2 {1,2}, #3 {2,3}, #4 {1,2,3}, #5 {4}, #6 {2}, #7 {3,4}
    assert_eq!(store.len(), 7);

    let sequence = GreedySequencer::new().sequence(&store, &lattice_costs());
    // idle→{4}=1, {4}→{2}=4, {2}→{2,3}=5, {2,3}→{3,4}=4,
    // {3,4}→{1,2,3}=12, {1,2,3}→{1,2}=5, {1,2}→{1}=3
    assert_eq!(sequence_ids(&sequence), vec![5, 6, 3, 7, 4, 2, 1]);
}

#[test]
fn optimized_shares_configurations_with_store() {
    let store = build_store(&lattice_requirements());
    let sequence = GreedySequencer::new().sequence(&store, &lattice_costs());
    for config in sequence.configurations() {
        let original = store.get(config.id()).unwrap();
        assert!(Arc::ptr_eq(original, config));
    }
}

#[test]
fn greedy_never_worse_than_baseline_on_lattice() {
    let store = build_store(&lattice_requirements());
    let costs = lattice_costs();
    let reporter = CostReporter::new(&costs);
    let baseline = BaselineSequencer::new().sequence(&store, &costs);
    let greedy = GreedySequencer::new().sequence(&store, &costs);
    let cmp = reporter.compare(&baseline, &greedy, CostMode::Relative);
    assert!(cmp.combined_savings() > 0);
    assert_eq!(baseline.steps()[0].delta().apply(), &scenario_set(&[1]));
}
