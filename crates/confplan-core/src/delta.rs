//! Apply/retract deltas for an ordering of configurations
//!
//! A [`Delta`] belongs to a (configuration, position) pair, never to the
//! configuration itself: reordering produces a fresh [`Sequence`] with fresh
//! deltas while the shared configurations stay untouched.

use crate::store::Configuration;
use crate::types::{ConfigurationId, ScenarioSet};
use std::sync::Arc;

/// Scenarios switched on and off when entering a position
///
/// # Invariants
/// - `apply ∩ retract = ∅`
/// - `current = (previous − retract) ∪ apply`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    apply: ScenarioSet,
    retract: ScenarioSet,
}

impl Delta {
    /// Delta for moving from `previous` to `current`
    #[must_use]
    pub fn between(previous: &ScenarioSet, current: &ScenarioSet) -> Self {
        Self {
            apply: current.difference(previous),
            retract: previous.difference(current),
        }
    }

    /// Delta for realising `scenarios` from the idle state
    #[must_use]
    pub fn from_empty(scenarios: &ScenarioSet) -> Self {
        Self {
            apply: scenarios.clone(),
            retract: ScenarioSet::new(),
        }
    }

    /// Newly activated scenarios
    #[inline]
    #[must_use]
    pub fn apply(&self) -> &ScenarioSet {
        &self.apply
    }

    /// Deactivated scenarios
    #[inline]
    #[must_use]
    pub fn retract(&self) -> &ScenarioSet {
        &self.retract
    }

    /// True when nothing changes
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.apply.is_empty() && self.retract.is_empty()
    }

    /// Number of scenario switches
    #[inline]
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.apply.len() + self.retract.len()
    }
}

/// One position of an ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceStep {
    configuration: Arc<Configuration>,
    delta: Delta,
}

impl SequenceStep {
    /// Configuration placed at this position
    #[inline]
    #[must_use]
    pub fn configuration(&self) -> &Arc<Configuration> {
        &self.configuration
    }

    /// Delta relative to the previous position
    #[inline]
    #[must_use]
    pub fn delta(&self) -> &Delta {
        &self.delta
    }
}

/// An ordering of configurations with per-position deltas
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    steps: Vec<SequenceStep>,
}

impl Sequence {
    /// Compute deltas for configurations in the given order
    ///
    /// Position 0 starts from the idle (empty) state.
    #[must_use]
    pub fn from_order(order: impl IntoIterator<Item = Arc<Configuration>>) -> Self {
        let mut previous = ScenarioSet::new();
        let steps = order
            .into_iter()
            .map(|configuration| {
                let delta = Delta::between(&previous, configuration.scenarios());
                previous = configuration.scenarios().clone();
                SequenceStep {
                    configuration,
                    delta,
                }
            })
            .collect();
        Self { steps }
    }

    /// Steps in execution order
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[SequenceStep] {
        &self.steps
    }

    /// Number of positions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True for the empty ordering
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Configuration ids in execution order
    #[must_use]
    pub fn ids(&self) -> Vec<ConfigurationId> {
        self.steps.iter().map(|s| s.configuration.id()).collect()
    }

    /// Configurations in execution order
    pub fn configurations(&self) -> impl Iterator<Item = &Arc<Configuration>> + '_ {
        self.steps.iter().map(|s| &s.configuration)
    }

    /// Scenarios still active after the last position
    ///
    /// Retracting them returns the system to idle. Computed at reporting
    /// time; it is not a configuration.
    #[must_use]
    pub fn closing_retract(&self) -> ScenarioSet {
        self.steps
            .last()
            .map(|s| s.configuration.scenarios().clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Obligations;
    use crate::types::ScenarioId;

    fn set(ids: &[u64]) -> ScenarioSet {
        ids.iter().copied().map(ScenarioId).collect()
    }

    fn config(id: u64, scenarios: &[u64]) -> Arc<Configuration> {
        Arc::new(Configuration::new(
            ConfigurationId(id),
            set(scenarios),
            Obligations::new(),
        ))
    }

    #[test]
    fn first_step_applies_everything() {
        let seq = Sequence::from_order(vec![config(1, &[3, 19])]);
        let delta = seq.steps()[0].delta();
        assert_eq!(delta.apply(), &set(&[3, 19]));
        assert!(delta.retract().is_empty());
    }

    #[test]
    fn consecutive_deltas() {
        let seq = Sequence::from_order(vec![
            config(1, &[3]),
            config(2, &[3, 19]),
            config(3, &[19, 20]),
        ]);
        assert_eq!(seq.steps()[1].delta().apply(), &set(&[19]));
        assert!(seq.steps()[1].delta().retract().is_empty());
        assert_eq!(seq.steps()[2].delta().apply(), &set(&[20]));
        assert_eq!(seq.steps()[2].delta().retract(), &set(&[3]));
        assert_eq!(seq.closing_retract(), set(&[19, 20]));
        assert_eq!(
            seq.ids(),
            vec![ConfigurationId(1), ConfigurationId(2), ConfigurationId(3)]
        );
    }

    #[test]
    fn repeated_configuration_is_a_noop() {
        let seq = Sequence::from_order(vec![config(1, &[1]), config(1, &[1])]);
        assert!(seq.steps()[1].delta().is_noop());
    }

    #[test]
    fn empty_sequence_has_no_closing_retract() {
        let seq = Sequence::from_order(Vec::new());
        assert!(seq.is_empty());
        assert!(seq.closing_retract().is_empty());
    }

    #[test]
    fn from_empty_delta() {
        let delta = Delta::from_empty(&set(&[1, 2]));
        assert_eq!(delta.change_count(), 2);
        assert!(delta.retract().is_empty());
    }
}
