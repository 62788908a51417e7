//! Error handling for navigation assembly
//!
//! One `thiserror` enum covers every failure the pipeline can report.
//! Most of these never reach the caller: the orchestrator logs them per
//! fragment and carries on with the siblings.

use thiserror::Error;

/// Main error type for the assembly pipeline
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Failed to fetch fragment from {location}: {reason}")]
    Fetch { location: String, reason: String },

    #[error("Fragment endpoint {location} answered with HTTP {status}")]
    HttpStatus { location: String, status: u16 },

    #[error("Malformed fragment '{source_id}': {reason}")]
    MalformedFragment { source_id: String, reason: String },

    #[error("Localization failed: {reason}")]
    Localization { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Provider discovery failed: {0}")]
    Discovery(#[source] anyhow::Error),
}

impl AssemblyError {
    pub fn malformed(source_id: impl Into<String>, reason: impl Into<String>) -> Self {
        AssemblyError::MalformedFragment {
            source_id: source_id.into(),
            reason: reason.into(),
        }
    }

    pub fn fetch(location: impl Into<String>, reason: impl ToString) -> Self {
        AssemblyError::Fetch {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result alias used throughout the crate
pub type AssemblyResult<T> = Result<T, AssemblyError>;
