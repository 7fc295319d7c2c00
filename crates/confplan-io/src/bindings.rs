//! SPARQL-style result bindings
//!
//! Requirement and cost queries arrive as
//! `{"results": {"bindings": [{"field": {"value": "..."}}]}}` with every value
//! rendered as a string. Scenario lists are comma separated.

use crate::error::{IoError, IoResult};
use confplan_core::{Cost, QuantityId, RequirementId, RequirementRecord, ScenarioId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Top-level query result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparqlResults {
    /// Result set
    pub results: SparqlBindings,
}

/// Result rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparqlBindings {
    /// One map per row: variable → value
    pub bindings: Vec<BTreeMap<String, BindingValue>>,
}

/// One bound variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingValue {
    /// Lexical value
    pub value: String,
}

fn field<'a>(
    row: &'a BTreeMap<String, BindingValue>,
    index: usize,
    name: &'static str,
) -> IoResult<&'a str> {
    row.get(name)
        .map(|b| b.value.as_str())
        .ok_or(IoError::MissingField { index, field: name })
}

fn parse_id<T: FromStr>(name: &'static str, raw: &str) -> IoResult<T> {
    raw.trim().parse().map_err(|_| IoError::invalid_id(name, raw))
}

impl SparqlResults {
    /// Rows as requirement records
    ///
    /// A row without a `quantity` binding becomes a record without a
    /// quantity; the aggregator rejects it with a malformed-requirement error.
    ///
    /// # Errors
    /// Returns error when `id` or `scenarios` is missing or a number does
    /// not parse
    pub fn requirements(&self) -> IoResult<Vec<RequirementRecord>> {
        self.results
            .bindings
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let id: RequirementId = parse_id("id", field(row, index, "id")?)?;
                let scenarios = field(row, index, "scenarios")?
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| parse_id::<ScenarioId>("scenario", s))
                    .collect::<IoResult<Vec<_>>>()?;
                let quantity = row
                    .get("quantity")
                    .map(|b| parse_id::<QuantityId>("quantity", &b.value))
                    .transpose()?;
                Ok(RequirementRecord {
                    id,
                    scenarios,
                    quantity,
                })
            })
            .collect()
    }

    /// Rows as `scenarioID` → `cost` pairs
    ///
    /// # Errors
    /// Returns error when a field is missing or does not parse
    pub fn scenario_costs(&self) -> IoResult<Vec<(ScenarioId, Cost)>> {
        self.results
            .bindings
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let scenario = parse_id("scenarioID", field(row, index, "scenarioID")?)?;
                let cost = parse_id("cost", field(row, index, "cost")?)?;
                Ok((scenario, cost))
            })
            .collect()
    }
}
