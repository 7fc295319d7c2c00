//! Persisted test configuration documents
//!
//! - raw definitions: a bare list of entries without `apply`/`retract`
//! - sequence documents: `{"tests": [...]}` with `apply`/`retract` per entry
//!
//! Lists on the wire are always sorted ascending.

use crate::error::{IoError, IoResult};
use confplan_core::{
    Configuration, ConfigurationId, ConfigurationStore, Obligations, QuantityId, RequirementId,
    ScenarioId, ScenarioSet, Sequence, SequenceStep,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use uuid::Uuid;

/// Requirement ids attached to one quantity
///
/// Written as `{"requirements": [...]}`; a bare list is also read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "QuantityEntryRepr")]
pub struct QuantityEntry {
    /// Sorted requirement ids
    pub requirements: Vec<RequirementId>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QuantityEntryRepr {
    Object { requirements: Vec<RequirementId> },
    List(Vec<RequirementId>),
}

impl From<QuantityEntryRepr> for QuantityEntry {
    fn from(repr: QuantityEntryRepr) -> Self {
        match repr {
            QuantityEntryRepr::Object { requirements } | QuantityEntryRepr::List(requirements) => {
                Self { requirements }
            }
        }
    }
}

/// One persisted test configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEntry {
    /// Configuration id
    pub id: ConfigurationId,
    /// Optional external identity carried through re-sequencing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Uuid>,
    /// Sorted active scenarios
    pub scenarios: Vec<ScenarioId>,
    /// Quantity → requirements
    #[serde(default)]
    pub quantities: BTreeMap<QuantityId, QuantityEntry>,
    /// Scenarios applied relative to the previous entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply: Option<Vec<ScenarioId>>,
    /// Scenarios retracted relative to the previous entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retract: Option<Vec<ScenarioId>>,
}

impl TestEntry {
    /// Entry without sequence data
    #[must_use]
    pub fn from_configuration(configuration: &Configuration) -> Self {
        let quantities = configuration
            .quantities()
            .iter()
            .map(|(q, reqs)| {
                (
                    q,
                    QuantityEntry {
                        requirements: reqs.iter().copied().collect(),
                    },
                )
            })
            .collect();
        Self {
            id: configuration.id(),
            uuid: None,
            scenarios: configuration.scenarios().to_sorted_vec(),
            quantities,
            apply: None,
            retract: None,
        }
    }

    /// Entry annotated with its position's delta
    #[must_use]
    pub fn from_step(step: &SequenceStep) -> Self {
        let mut entry = Self::from_configuration(step.configuration());
        entry.apply = Some(step.delta().apply().to_sorted_vec());
        entry.retract = Some(step.delta().retract().to_sorted_vec());
        entry
    }

    /// Attach an external identity
    #[inline]
    #[must_use]
    pub fn with_uuid(mut self, uuid: Option<Uuid>) -> Self {
        self.uuid = uuid;
        self
    }

    /// Rebuild the configuration; lists become sets
    #[must_use]
    pub fn to_configuration(&self) -> Configuration {
        let obligations: Obligations = self
            .quantities
            .iter()
            .flat_map(|(q, entry)| entry.requirements.iter().map(move |r| (*q, *r)))
            .collect();
        Configuration::new(
            self.id,
            self.scenarios.iter().copied().collect(),
            obligations,
        )
    }
}

/// Sequence document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestsDocument {
    /// Entries in execution order
    pub tests: Vec<TestEntry>,
}

/// Either persisted shape
///
/// The shape is chosen from the top-level JSON value. Untagged dispatch
/// cannot be used here: it buffers objects with string keys, which the
/// integer-keyed `quantities` map then refuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestsInput {
    /// `{"tests": [...]}`
    Document(TestsDocument),
    /// `[...]`
    Raw(Vec<TestEntry>),
}

impl TestsInput {
    /// Parse either shape from JSON text
    ///
    /// # Errors
    /// Returns error when the text is neither a list of entries nor a
    /// `{"tests": [...]}` document
    pub fn from_json_str(text: &str) -> IoResult<Self> {
        if text.trim_start().starts_with('[') {
            Ok(Self::Raw(serde_json::from_str(text)?))
        } else {
            Ok(Self::Document(serde_json::from_str(text)?))
        }
    }

    /// Entries regardless of shape
    #[must_use]
    pub fn into_entries(self) -> Vec<TestEntry> {
        match self {
            Self::Document(document) => document.tests,
            Self::Raw(entries) => entries,
        }
    }
}

/// External identities keyed by configuration id
pub type UuidIndex = HashMap<ConfigurationId, Uuid>;

/// Collect the identities present on `entries`
#[must_use]
pub fn uuid_index(entries: &[TestEntry]) -> UuidIndex {
    entries
        .iter()
        .filter_map(|e| e.uuid.map(|u| (e.id, u)))
        .collect()
}

/// Fresh random identity for every configuration of a store
#[must_use]
pub fn assign_uuids(store: &ConfigurationStore) -> UuidIndex {
    store.iter().map(|c| (c.id(), Uuid::new_v4())).collect()
}

/// Raw definitions in store order
#[must_use]
pub fn raw_definitions(store: &ConfigurationStore, uuids: Option<&UuidIndex>) -> Vec<TestEntry> {
    store
        .iter()
        .map(|c| {
            TestEntry::from_configuration(c)
                .with_uuid(uuids.and_then(|index| index.get(&c.id()).copied()))
        })
        .collect()
}

/// Sequence document in execution order
#[must_use]
pub fn sequence_document(sequence: &Sequence, uuids: Option<&UuidIndex>) -> TestsDocument {
    let tests = sequence
        .steps()
        .iter()
        .map(|step| {
            let id = step.configuration().id();
            TestEntry::from_step(step).with_uuid(uuids.and_then(|index| index.get(&id).copied()))
        })
        .collect();
    TestsDocument { tests }
}

/// Store from persisted entries, keeping their ids and order
///
/// Any `apply`/`retract` on the entries is ignored; deltas are recomputed
/// for whichever ordering the store is sequenced into.
///
/// # Errors
/// Returns error when two entries share an id or a scenario set
pub fn store_from_entries(entries: &[TestEntry]) -> IoResult<ConfigurationStore> {
    let mut ids: HashSet<ConfigurationId> = HashSet::with_capacity(entries.len());
    let mut sets: HashMap<ScenarioSet, ConfigurationId> = HashMap::with_capacity(entries.len());
    let mut configurations = Vec::with_capacity(entries.len());

    for entry in entries {
        if !ids.insert(entry.id) {
            return Err(IoError::DuplicateConfigurationId { id: entry.id });
        }
        let configuration = entry.to_configuration();
        if let Some(first) = sets.insert(configuration.scenarios().clone(), entry.id) {
            return Err(IoError::DuplicateScenarioSet {
                id: entry.id,
                first,
                scenarios: configuration.scenarios().clone(),
            });
        }
        configurations.push(configuration);
    }

    Ok(ConfigurationStore::new(configurations))
}
