//! Cost table documents
//!
//! Two shapes are accepted:
//! - a cost document `{"scenarios": {"3": 5}, "observations": {"10": 2}}`
//! - SPARQL bindings with `scenarioID` / `cost` (scenario costs only)

use crate::bindings::SparqlResults;
use crate::error::{IoError, IoResult};
use confplan_core::{Cost, CostModel, QuantityId, ScenarioId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cost document keyed by decimal id strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostsDocument {
    /// Scenario id → cost
    #[serde(default)]
    pub scenarios: BTreeMap<String, Cost>,
    /// Quantity id → observation cost
    #[serde(default)]
    pub observations: BTreeMap<String, Cost>,
}

impl CostsDocument {
    /// Build the cost model
    ///
    /// # Errors
    /// Returns error when a key is not an integer id
    pub fn to_model(&self) -> IoResult<CostModel> {
        let scenarios = self
            .scenarios
            .iter()
            .map(|(k, v)| {
                k.parse::<ScenarioId>()
                    .map(|id| (id, *v))
                    .map_err(|_| IoError::invalid_id("scenario", k.as_str()))
            })
            .collect::<IoResult<Vec<_>>>()?;
        let observations = self
            .observations
            .iter()
            .map(|(k, v)| {
                k.parse::<QuantityId>()
                    .map(|id| (id, *v))
                    .map_err(|_| IoError::invalid_id("quantity", k.as_str()))
            })
            .collect::<IoResult<Vec<_>>>()?;
        Ok(CostModel::from_tables(scenarios, observations))
    }
}

/// Any accepted cost input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CostsInput {
    /// SPARQL scenario-cost bindings
    Bindings(SparqlResults),
    /// Cost document
    Document(CostsDocument),
}

impl CostsInput {
    /// Build the cost model
    ///
    /// # Errors
    /// Returns error when an id or cost does not parse
    pub fn to_model(&self) -> IoResult<CostModel> {
        match self {
            Self::Bindings(results) => Ok(CostModel::from_tables(
                results.scenario_costs()?,
                std::iter::empty(),
            )),
            Self::Document(document) => document.to_model(),
        }
    }
}
