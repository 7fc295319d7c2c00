//! Superset closure
//!
//! A configuration whose scenario set is a strict superset of another's
//! inherits all of that configuration's obligations. Obligations never flow
//! from a superset down to a subset.
//!
//! # Enumeration order
//! Configuration ids are assigned `1..=n` in the aggregation's first-seen
//! order of scenario sets, so identical input always yields identical ids.
//!
//! # Complexity
//! O(n²) subset checks over the distinct scenario sets.

use crate::aggregate::Aggregation;
use crate::store::{Configuration, ConfigurationStore, Obligations};
use crate::types::{ConfigurationId, ScenarioSet};

/// Close an aggregation and assign configuration ids
#[must_use]
pub fn close(aggregation: Aggregation) -> ConfigurationStore {
    let entries: Vec<(ScenarioSet, Obligations)> =
        aggregation.into_entries().into_iter().collect();
    let closed = close_entries(&entries);

    let configurations = entries
        .into_iter()
        .zip(closed)
        .enumerate()
        .map(|(idx, ((scenarios, _), obligations))| {
            Configuration::new(ConfigurationId(idx as u64 + 1), scenarios, obligations)
        })
        .collect();

    ConfigurationStore::new(configurations)
}

/// Re-run the closure over an existing store, keeping ids and order
///
/// Closing an already-closed store returns an identical store.
#[must_use]
pub fn close_store(store: &ConfigurationStore) -> ConfigurationStore {
    let entries: Vec<(ScenarioSet, Obligations)> = store
        .iter()
        .map(|c| (c.scenarios().clone(), c.quantities().clone()))
        .collect();
    let closed = close_entries(&entries);

    let configurations = store
        .iter()
        .zip(closed)
        .map(|(c, obligations)| Configuration::new(c.id(), c.scenarios().clone(), obligations))
        .collect();

    ConfigurationStore::new(configurations)
}

/// Merge every strict subset's original obligations into each superset
///
/// Reading from the unmerged inputs is sufficient: inclusion is transitive,
/// so every indirect subset is also a direct one.
fn close_entries(entries: &[(ScenarioSet, Obligations)]) -> Vec<Obligations> {
    let mut closed: Vec<Obligations> = entries.iter().map(|(_, o)| o.clone()).collect();
    let mut propagated = 0usize;

    for (sub, sub_obligations) in entries {
        for (idx, (sup, _)) in entries.iter().enumerate() {
            if sub.is_strict_subset(sup) {
                propagated += closed[idx].merge(sub_obligations);
            }
        }
    }

    tracing::info!(
        "Closed {} configurations, {} inherited obligations",
        entries.len(),
        propagated
    );
    closed
}
