//! Configuration store
//!
//! The ordered, immutable list of test configurations produced by the
//! closure engine. Orderings reference configurations through `Arc` and
//! never mutate them.

use crate::error::PlanError;
use crate::types::{ConfigurationId, QuantityId, RequirementId, ScenarioSet};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Quantity → requirement ids obligations of one configuration
///
/// Sets throughout, so merging never duplicates a requirement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Obligations(BTreeMap<QuantityId, BTreeSet<RequirementId>>);

impl Obligations {
    /// Create empty obligations
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `requirement` demands `quantity`
    #[inline]
    pub fn insert(&mut self, quantity: QuantityId, requirement: RequirementId) -> bool {
        self.0.entry(quantity).or_default().insert(requirement)
    }

    /// Set union with `other`, returning how many requirement ids were new
    pub fn merge(&mut self, other: &Self) -> usize {
        let mut added = 0;
        for (quantity, requirements) in &other.0 {
            let target = self.0.entry(*quantity).or_default();
            for requirement in requirements {
                if target.insert(*requirement) {
                    added += 1;
                }
            }
        }
        added
    }

    /// True when every obligation of `other` is present here
    #[must_use]
    pub fn contains_all(&self, other: &Self) -> bool {
        other.0.iter().all(|(q, reqs)| {
            self.0
                .get(q)
                .is_some_and(|mine| reqs.is_subset(mine))
        })
    }

    /// Requirements attached to a quantity
    #[inline]
    #[must_use]
    pub fn requirements(&self, quantity: QuantityId) -> Option<&BTreeSet<RequirementId>> {
        self.0.get(&quantity)
    }

    /// Quantities in ascending order
    #[inline]
    pub fn quantity_ids(&self) -> impl Iterator<Item = QuantityId> + '_ {
        self.0.keys().copied()
    }

    /// (quantity, requirements) pairs in ascending quantity order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (QuantityId, &BTreeSet<RequirementId>)> + '_ {
        self.0.iter().map(|(q, r)| (*q, r))
    }

    /// Number of quantities
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no quantity is attached
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Distinct requirement ids across all quantities
    #[must_use]
    pub fn requirement_ids(&self) -> BTreeSet<RequirementId> {
        self.0.values().flatten().copied().collect()
    }
}

impl FromIterator<(QuantityId, RequirementId)> for Obligations {
    fn from_iter<I: IntoIterator<Item = (QuantityId, RequirementId)>>(iter: I) -> Self {
        let mut obligations = Self::new();
        for (quantity, requirement) in iter {
            obligations.insert(quantity, requirement);
        }
        obligations
    }
}

/// One distinct set of simultaneously active scenarios and what it satisfies
///
/// # Invariants
/// - `scenarios` is unique within a store
/// - immutable after the closure engine creates it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    id: ConfigurationId,
    scenarios: ScenarioSet,
    quantities: Obligations,
}

impl Configuration {
    /// Create configuration
    #[inline]
    #[must_use]
    pub fn new(id: ConfigurationId, scenarios: ScenarioSet, quantities: Obligations) -> Self {
        Self {
            id,
            scenarios,
            quantities,
        }
    }

    /// Stable identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> ConfigurationId {
        self.id
    }

    /// Active scenarios
    #[inline]
    #[must_use]
    pub fn scenarios(&self) -> &ScenarioSet {
        &self.scenarios
    }

    /// Resolved obligations
    #[inline]
    #[must_use]
    pub fn quantities(&self) -> &Obligations {
        &self.quantities
    }

    /// Quantities observed while this configuration is active
    #[inline]
    pub fn quantity_ids(&self) -> impl Iterator<Item = QuantityId> + '_ {
        self.quantities.quantity_ids()
    }
}

/// Ordered, read-only collection of configurations
#[derive(Debug, Clone, Default)]
pub struct ConfigurationStore {
    configurations: Vec<Arc<Configuration>>,
}

impl ConfigurationStore {
    /// Build store from configurations in enumeration order
    #[must_use]
    pub fn new(configurations: Vec<Configuration>) -> Self {
        Self {
            configurations: configurations.into_iter().map(Arc::new).collect(),
        }
    }

    /// Number of configurations
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    /// True when the store holds nothing to plan
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    /// Fail with [`PlanError::EmptyConfigurationSet`] when empty
    ///
    /// # Errors
    /// Returns error if the store holds no configuration
    pub fn ensure_non_empty(&self) -> Result<&Self, PlanError> {
        if self.is_empty() {
            return Err(PlanError::EmptyConfigurationSet);
        }
        Ok(self)
    }

    /// Configurations in enumeration order
    #[inline]
    #[must_use]
    pub fn configurations(&self) -> &[Arc<Configuration>] {
        &self.configurations
    }

    /// Iterate in enumeration order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Configuration>> + '_ {
        self.configurations.iter()
    }

    /// Lookup by id
    #[must_use]
    pub fn get(&self, id: ConfigurationId) -> Option<&Arc<Configuration>> {
        self.configurations.iter().find(|c| c.id() == id)
    }

    /// Lookup by exact scenario set
    #[must_use]
    pub fn find_by_scenarios(&self, scenarios: &ScenarioSet) -> Option<&Arc<Configuration>> {
        self.configurations.iter().find(|c| c.scenarios() == scenarios)
    }

    /// Distinct requirement ids covered by the whole store
    #[must_use]
    pub fn requirement_ids(&self) -> BTreeSet<RequirementId> {
        self.configurations
            .iter()
            .flat_map(|c| c.quantities().requirement_ids())
            .collect()
    }
}
