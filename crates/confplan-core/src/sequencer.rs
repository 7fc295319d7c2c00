//! Configuration sequencing
//!
//! Provides the [`Sequencer`] trait and two orderings:
//! - [`BaselineSequencer`]: store enumeration order (the "unoptimized" plan)
//! - [`GreedySequencer`]: nearest-neighbour construction over transition cost
//!
//! # Greedy heuristic
//! Starting from the idle state, repeatedly place the remaining configuration
//! with the lowest [`CostModel::transition_cost`] from the currently active
//! scenarios. The result is not guaranteed optimal and is not meant to be:
//! saved optimized plans depend on reproducing exactly this choice sequence.
//!
//! # Tie-break
//! Candidates are scanned in store enumeration order (ascending configuration
//! id) and only a strictly cheaper candidate replaces the current best, so the
//! first minimum wins. Placing a configuration removes it without disturbing
//! the relative order of the others.

use crate::cost::{Cost, CostModel};
use crate::delta::Sequence;
use crate::error::ParseOptionError;
use crate::store::{Configuration, ConfigurationStore};
use crate::types::ScenarioSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Produces an ordering of a configuration store
///
/// Implementations never mutate the store; they return a new [`Sequence`]
/// whose deltas come from a fresh pass over the final order.
pub trait Sequencer: Send + Sync + std::fmt::Debug {
    /// Order every configuration of `store`
    fn sequence(&self, store: &ConfigurationStore, costs: &CostModel) -> Sequence;

    /// Sequencer name (for logging/serialization)
    fn name(&self) -> &'static str;
}

/// Keeps the closure engine's enumeration order
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineSequencer;

impl BaselineSequencer {
    /// Create baseline sequencer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Sequencer for BaselineSequencer {
    fn sequence(&self, store: &ConfigurationStore, _costs: &CostModel) -> Sequence {
        Sequence::from_order(store.iter().cloned())
    }

    fn name(&self) -> &'static str {
        "baseline"
    }
}

/// Greedy nearest-neighbour ordering under transition cost
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedySequencer;

impl GreedySequencer {
    /// Create greedy sequencer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Index and cost of the first cheapest candidate
    fn select_next(
        current: &ScenarioSet,
        remaining: &[&Arc<Configuration>],
        costs: &CostModel,
    ) -> Option<(usize, Cost)> {
        let mut best: Option<(usize, Cost)> = None;
        for (idx, candidate) in remaining.iter().enumerate() {
            let cost = costs.transition_cost(current, candidate.scenarios());
            match best {
                Some((_, best_cost)) if cost >= best_cost => {}
                _ => best = Some((idx, cost)),
            }
        }
        best
    }
}

impl Sequencer for GreedySequencer {
    fn sequence(&self, store: &ConfigurationStore, costs: &CostModel) -> Sequence {
        let mut remaining: Vec<&Arc<Configuration>> = store.iter().collect();
        let mut ordered: Vec<Arc<Configuration>> = Vec::with_capacity(remaining.len());
        let mut current = ScenarioSet::new();

        while let Some((idx, cost)) = Self::select_next(&current, &remaining, costs) {
            let chosen = remaining.remove(idx);
            tracing::debug!(
                "Position {}: configuration {} at transition cost {}",
                ordered.len(),
                chosen.id(),
                cost
            );
            current = chosen.scenarios().clone();
            ordered.push(Arc::clone(chosen));
        }

        tracing::info!("Sequenced {} configurations greedily", ordered.len());
        Sequence::from_order(ordered)
    }

    fn name(&self) -> &'static str {
        "greedy"
    }
}

/// Sequencer selection for configuration files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequencerKind {
    /// [`GreedySequencer`]
    #[default]
    Greedy,
    /// [`BaselineSequencer`]
    Baseline,
}

impl SequencerKind {
    /// Instantiate the selected sequencer
    #[must_use]
    pub fn build(self) -> Box<dyn Sequencer> {
        match self {
            Self::Greedy => Box::new(GreedySequencer::new()),
            Self::Baseline => Box::new(BaselineSequencer::new()),
        }
    }
}

impl std::str::FromStr for SequencerKind {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "greedy" => Ok(Self::Greedy),
            "baseline" => Ok(Self::Baseline),
            other => Err(ParseOptionError::UnknownSequencer(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Obligations;
    use crate::types::{ConfigurationId, ScenarioId};

    fn set(ids: &[u64]) -> ScenarioSet {
        ids.iter().copied().map(ScenarioId).collect()
    }

    fn store(configs: &[&[u64]]) -> ConfigurationStore {
        ConfigurationStore::new(
            configs
                .iter()
                .enumerate()
                .map(|(i, s)| Configuration::new(ConfigurationId(i as u64 + 1), set(s), Obligations::new()))
                .collect(),
        )
    }

    fn ids(seq: &Sequence) -> Vec<u64> {
        seq.ids().into_iter().map(|id| id.0).collect()
    }

    #[test]
    fn baseline_keeps_store_order() {
        let store = store(&[&[1, 2], &[1], &[3]]);
        let seq = BaselineSequencer::new().sequence(&store, &CostModel::new());
        assert_eq!(ids(&seq), vec![1, 2, 3]);
    }

    #[test]
    fn greedy_prefers_cheap_transitions() {
        let costs = CostModel::new()
            .with_scenario_cost(ScenarioId(1), 10)
            .with_scenario_cost(ScenarioId(2), 1)
            .with_scenario_cost(ScenarioId(3), 1);
        // From idle: {2}=1, {1,2}=11, {3}=1 -> first minimum is #2 ({2}).
        // From {2}: {1,2}=10, {3}=2 -> #3. From {3}: {1,2}=12 -> #1.
        let store = store(&[&[1, 2], &[2], &[3]]);
        let seq = GreedySequencer::new().sequence(&store, &costs);
        assert_eq!(ids(&seq), vec![2, 3, 1]);
    }

    #[test]
    fn ties_pick_first_in_enumeration_order() {
        let store = store(&[&[5], &[6], &[7]]);
        let seq = GreedySequencer::new().sequence(&store, &CostModel::new());
        assert_eq!(ids(&seq), vec![1, 2, 3]);
    }

    #[test]
    fn deltas_follow_final_order() {
        let costs = CostModel::new().with_scenario_cost(ScenarioId(9), 100);
        let store = store(&[&[9], &[1]]);
        let seq = GreedySequencer::new().sequence(&store, &costs);
        assert_eq!(ids(&seq), vec![2, 1]);
        assert_eq!(seq.steps()[0].delta().apply(), &set(&[1]));
        assert_eq!(seq.steps()[1].delta().apply(), &set(&[9]));
        assert_eq!(seq.steps()[1].delta().retract(), &set(&[1]));
    }

    #[test]
    fn empty_store_gives_empty_sequence() {
        let seq = GreedySequencer::new().sequence(&ConfigurationStore::default(), &CostModel::new());
        assert!(seq.is_empty());
    }

    #[test]
    fn kind_parses_and_builds() {
        assert_eq!("Greedy".parse::<SequencerKind>(), Ok(SequencerKind::Greedy));
        assert_eq!(SequencerKind::Baseline.build().name(), "baseline");
        let err = "exact".parse::<SequencerKind>().unwrap_err();
        assert_eq!(err, ParseOptionError::UnknownSequencer("exact".into()));
        assert_eq!(err.to_string(), "unknown sequencer 'exact'");
    }
}
