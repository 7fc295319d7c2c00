//! Reading and writing planner documents on disk

use crate::bindings::SparqlResults;
use crate::costs::CostsInput;
use crate::error::{IoError, IoResult};
use crate::tests_doc::{TestEntry, TestsInput};
use confplan_core::{CostModel, PlannerConfig, RequirementRecord};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Accepted requirement inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequirementsInput {
    /// SPARQL query result
    Bindings(SparqlResults),
    /// `[{"id": 1, "scenarios": [3], "quantity": 10}]`
    Records(Vec<RequirementRecord>),
}

impl RequirementsInput {
    /// Requirement records regardless of shape
    ///
    /// # Errors
    /// Returns error when a binding is missing or unparsable
    pub fn into_records(self) -> IoResult<Vec<RequirementRecord>> {
        match self {
            Self::Bindings(results) => results.requirements(),
            Self::Records(records) => Ok(records),
        }
    }
}

/// Deserialize a JSON file
///
/// # Errors
/// Returns error when the file cannot be read or parsed
pub fn read_json<T: DeserializeOwned>(path: &Path) -> IoResult<T> {
    let text = fs::read_to_string(path).map_err(|e| IoError::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

/// Serialize to a pretty-printed JSON file, creating parent directories
///
/// # Errors
/// Returns error when the file cannot be written
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> IoResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| IoError::io(parent, e))?;
    }
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    fs::write(path, text).map_err(|e| IoError::io(path, e))?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

/// Load requirement records from bindings or a plain list
///
/// # Errors
/// Returns error when the file is unreadable or holds neither shape
pub fn load_requirements(path: &Path) -> IoResult<Vec<RequirementRecord>> {
    let records = read_json::<RequirementsInput>(path)?.into_records()?;
    tracing::info!("Loaded {} requirements from {}", records.len(), path.display());
    Ok(records)
}

/// Load a cost model from bindings or a cost document
///
/// # Errors
/// Returns error when the file is unreadable or holds neither shape
pub fn load_costs(path: &Path) -> IoResult<CostModel> {
    let model = read_json::<CostsInput>(path)?.to_model()?;
    tracing::info!(
        "Loaded {} scenario and {} observation costs from {}",
        model.scenario_entries(),
        model.observation_entries(),
        path.display()
    );
    Ok(model)
}

/// Load test entries from a raw list or a sequence document
///
/// # Errors
/// Returns error when the file is unreadable or holds neither shape
pub fn load_tests(path: &Path) -> IoResult<Vec<TestEntry>> {
    let text = fs::read_to_string(path).map_err(|e| IoError::io(path, e))?;
    let entries = TestsInput::from_json_str(&text)?.into_entries();
    tracing::info!("Loaded {} tests from {}", entries.len(), path.display());
    Ok(entries)
}

/// Load planner configuration from TOML
///
/// # Errors
/// Returns error when the file is unreadable or invalid
pub fn load_config(path: &Path) -> IoResult<PlannerConfig> {
    let text = fs::read_to_string(path).map_err(|e| IoError::io(path, e))?;
    Ok(PlannerConfig::from_toml_str(&text)?)
}
