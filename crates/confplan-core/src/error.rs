//! Error types for the planning engine
//!
//! Only malformed input is an error. Unknown ids during cost lookup resolve
//! to zero cost and are never reported here.

use crate::types::RequirementId;

/// Main planning error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// A requirement record cannot be placed in the scenario lattice
    #[error("malformed requirement {id}: {reason}")]
    MalformedRequirement {
        /// Offending record
        id: RequirementId,
        /// What is missing
        reason: MalformedReason,
    },

    /// The caller required at least one configuration
    #[error("no test configurations to plan")]
    EmptyConfigurationSet,
}

impl PlanError {
    /// Planning is deterministic: the same input fails the same way again.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Shorthand for an empty scenario set
    #[inline]
    #[must_use]
    pub fn empty_scenarios(id: RequirementId) -> Self {
        Self::MalformedRequirement {
            id,
            reason: MalformedReason::EmptyScenarioSet,
        }
    }

    /// Shorthand for a missing quantity
    #[inline]
    #[must_use]
    pub fn missing_quantity(id: RequirementId) -> Self {
        Self::MalformedRequirement {
            id,
            reason: MalformedReason::MissingQuantity,
        }
    }
}

/// Why a requirement record was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// `scenarios` was empty
    EmptyScenarioSet,
    /// `quantity` was absent
    MissingQuantity,
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyScenarioSet => write!(f, "empty scenario set"),
            Self::MissingQuantity => write!(f, "missing quantity"),
        }
    }
}

/// Result alias for engine operations
pub type PlanResult<T> = Result<T, PlanError>;

/// Unrecognised name for a configurable option
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseOptionError {
    /// Not `absolute` or `relative`
    #[error("unknown cost mode '{0}'")]
    UnknownCostMode(String),

    /// Not `greedy` or `baseline`
    #[error("unknown sequencer '{0}'")]
    UnknownSequencer(String),
}
