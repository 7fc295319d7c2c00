//! confplan I/O
//!
//! Wire formats around the planning core:
//!
//! - [`SparqlResults`]: requirement and scenario-cost query bindings
//! - [`CostsInput`]: cost tables from bindings or a cost document
//! - [`TestEntry`] / [`TestsDocument`]: raw definitions and sequence documents
//! - [`PlanSummaryDocument`] / [`CostReportDocument`]: cost outputs
//! - [`load_requirements`], [`load_costs`], [`load_tests`], [`load_config`],
//!   [`write_json`]: file helpers

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod bindings;
mod costs;
mod error;
mod files;
mod summary;
mod tests_doc;

pub use bindings::{BindingValue, SparqlBindings, SparqlResults};
pub use costs::{CostsDocument, CostsInput};
pub use error::{IoError, IoResult};
pub use files::{
    load_config, load_costs, load_requirements, load_tests, read_json, write_json,
    RequirementsInput,
};
pub use summary::{CostReportDocument, PlanSummaryDocument};
pub use tests_doc::{
    assign_uuids, raw_definitions, sequence_document, store_from_entries, uuid_index,
    QuantityEntry, TestEntry, TestsDocument, TestsInput, UuidIndex,
};
