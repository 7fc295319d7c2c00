//! Requirement aggregation
//!
//! Groups raw requirement records by their exact scenario set. Two records
//! with the same scenario set land in the same entry even when they demand
//! different quantities.

use crate::error::{PlanError, PlanResult};
use crate::store::Obligations;
use crate::types::{QuantityId, RequirementId, ScenarioId, ScenarioSet};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Raw requirement record as delivered by collaborators
///
/// `quantity` is optional here so that a record lacking it can be reported
/// instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementRecord {
    /// Unique requirement id
    pub id: RequirementId,
    /// Scenarios that must all be active
    #[serde(default)]
    pub scenarios: Vec<ScenarioId>,
    /// Quantity the requirement is associated with
    #[serde(default)]
    pub quantity: Option<QuantityId>,
}

impl RequirementRecord {
    /// Create record
    #[must_use]
    pub fn new(
        id: RequirementId,
        scenarios: impl IntoIterator<Item = ScenarioId>,
        quantity: QuantityId,
    ) -> Self {
        Self {
            id,
            scenarios: scenarios.into_iter().collect(),
            quantity: Some(quantity),
        }
    }

    /// Validate into a [`Requirement`]
    ///
    /// # Errors
    /// Returns [`PlanError::MalformedRequirement`] on an empty scenario set
    /// or a missing quantity
    pub fn validate(&self) -> PlanResult<Requirement> {
        if self.scenarios.is_empty() {
            return Err(PlanError::empty_scenarios(self.id));
        }
        let quantity = self
            .quantity
            .ok_or_else(|| PlanError::missing_quantity(self.id))?;
        Ok(Requirement {
            id: self.id,
            scenarios: self.scenarios.iter().copied().collect(),
            quantity,
        })
    }
}

/// Validated, immutable requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Unique requirement id
    pub id: RequirementId,
    /// Non-empty scenario set
    pub scenarios: ScenarioSet,
    /// Associated quantity
    pub quantity: QuantityId,
}

/// Scenario set → obligations, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    entries: IndexMap<ScenarioSet, Obligations>,
}

impl Aggregation {
    /// Number of distinct scenario sets
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no requirement was aggregated
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Obligations for an exact scenario set
    #[inline]
    #[must_use]
    pub fn get(&self, scenarios: &ScenarioSet) -> Option<&Obligations> {
        self.entries.get(scenarios)
    }

    /// Entries in first-seen order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&ScenarioSet, &Obligations)> + '_ {
        self.entries.iter()
    }

    /// Add one obligation under a scenario set
    pub fn insert(&mut self, scenarios: ScenarioSet, quantity: QuantityId, requirement: RequirementId) {
        self.entries
            .entry(scenarios)
            .or_default()
            .insert(quantity, requirement);
    }

    pub(crate) fn into_entries(self) -> IndexMap<ScenarioSet, Obligations> {
        self.entries
    }
}

impl FromIterator<(ScenarioSet, Obligations)> for Aggregation {
    fn from_iter<I: IntoIterator<Item = (ScenarioSet, Obligations)>>(iter: I) -> Self {
        let mut entries: IndexMap<ScenarioSet, Obligations> = IndexMap::new();
        for (scenarios, obligations) in iter {
            entries.entry(scenarios).or_default().merge(&obligations);
        }
        Self { entries }
    }
}

/// Aggregate raw records by exact scenario set
///
/// All records are validated before anything is grouped; one malformed
/// record aborts the run with no partial result.
///
/// # Errors
/// Returns [`PlanError::MalformedRequirement`] for the first bad record
pub fn aggregate<'a, I>(records: I) -> PlanResult<Aggregation>
where
    I: IntoIterator<Item = &'a RequirementRecord>,
{
    let requirements = records
        .into_iter()
        .map(RequirementRecord::validate)
        .collect::<PlanResult<Vec<_>>>()?;

    let mut seen = HashSet::with_capacity(requirements.len());
    let mut aggregation = Aggregation::default();
    for requirement in &requirements {
        if !seen.insert(requirement.id) {
            tracing::warn!("Duplicate requirement id {}", requirement.id);
        }
        aggregation.insert(
            requirement.scenarios.clone(),
            requirement.quantity,
            requirement.id,
        );
    }

    tracing::info!(
        "Aggregated {} requirements into {} scenario sets",
        requirements.len(),
        aggregation.len()
    );
    Ok(aggregation)
}
