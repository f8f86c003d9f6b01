//! Error types for the decision engine core.
//!
//! Service and IO boundaries use [anyhow]; everything that runs inside a single
//! decision returns [DecisionError] so callers can tell a broken profile apart
//! from a malformed release.

use thiserror::Error;

/// Shared `Result` alias for the decision core.
pub type Result<T> = std::result::Result<T, DecisionError>;

/// Errors that stop a single decision from being evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    /// The profile is malformed (missing tier, bad cutoff, ...).
    #[error("invalid configuration for profile '{profile}': {details}")]
    Configuration { profile: String, details: String },

    /// A quality model handed to the core is unusable (e.g. version 0).
    #[error("invalid input: {details}")]
    InvalidInput { details: String },
}

impl DecisionError {
    pub fn configuration(profile: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Configuration {
            profile: profile.into(),
            details: details.into(),
        }
    }

    pub fn invalid_input(details: impl Into<String>) -> Self {
        Self::InvalidInput {
            details: details.into(),
        }
    }

    /// Stable machine-parseable error code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "DECISION-1001",
            Self::InvalidInput { .. } => "DECISION-2001",
        }
    }

    /// The core performs no I/O, so nothing it reports goes away on retry.
    pub const fn is_retryable(&self) -> bool {
        false
    }
}
