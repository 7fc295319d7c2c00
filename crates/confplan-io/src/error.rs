//! Error types for loading and writing planner documents

use confplan_core::{ConfigurationId, PlanError, ScenarioSet};
use std::path::PathBuf;

/// Document I/O error
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Filesystem failure
    #[error("cannot access {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON syntax or shape error
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML syntax or shape error
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// A binding field held something other than an integer id
    #[error("invalid {field} '{value}'")]
    InvalidId {
        /// Binding or key name
        field: &'static str,
        /// Raw text
        value: String,
    },

    /// A binding lacked a required field
    #[error("binding {index} has no '{field}'")]
    MissingField {
        /// Position in the bindings list
        index: usize,
        /// Field name
        field: &'static str,
    },

    /// Two persisted entries share a configuration id
    #[error("configuration {id} appears more than once")]
    DuplicateConfigurationId {
        /// Repeated id
        id: ConfigurationId,
    },

    /// Two persisted entries share a scenario set
    #[error("configuration {id} repeats scenario set {scenarios} of {first}")]
    DuplicateScenarioSet {
        /// Later entry
        id: ConfigurationId,
        /// Entry that first used the set
        first: ConfigurationId,
        /// Shared set
        scenarios: ScenarioSet,
    },

    /// Planning error surfaced while converting documents
    #[error(transparent)]
    Plan(#[from] PlanError),
}

impl IoError {
    /// Wrap a filesystem error with its path
    #[inline]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Shorthand for an unparsable id
    #[inline]
    pub fn invalid_id(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidId {
            field,
            value: value.into(),
        }
    }
}

/// Result alias for document operations
pub type IoResult<T> = Result<T, IoError>;
