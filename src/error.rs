//! Error types for an updater run.
//!
//! Everything below the orchestrator returns one of these; the orchestrator
//! catches it once and turns its message into the run's `error_message`.
//! Per-row extraction defects are not errors: those rows are filtered out.

use thiserror::Error;

use crate::db::DbError;

/// Error types for the update pipeline
#[derive(Debug, Error)]
pub enum UpdateError {
    // Remote fetch
    #[error("Response status: {0}")]
    FetchStatus(u16),

    #[error("Request failed: {0}")]
    Network(String),

    #[error("Failed to decode Wikidata response: {0}")]
    Decode(String),

    // Processing
    #[error("Extracting data failed: {0}")]
    Extraction(String),

    // Storage
    #[error("Checking last fetch date failed: {0}")]
    Staleness(String),

    #[error("Inserting entities failed: {0}")]
    Insertion(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl UpdateError {
    /// Pipeline stage the error belongs to, for log lines.
    pub fn stage(&self) -> &'static str {
        match self {
            UpdateError::FetchStatus(_) | UpdateError::Network(_) | UpdateError::Decode(_) => {
                "fetch"
            }
            UpdateError::Extraction(_) => "extract",
            UpdateError::Staleness(_) => "staleness",
            UpdateError::Insertion(_) => "write",
            UpdateError::Configuration(_) => "config",
        }
    }

    /// Returns true if the remote service, not this process, is the likely cause
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            UpdateError::FetchStatus(_) | UpdateError::Network(_) | UpdateError::Decode(_)
        )
    }
}

impl From<DbError> for UpdateError {
    fn from(err: DbError) -> Self {
        UpdateError::Insertion(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        assert_eq!(UpdateError::FetchStatus(503).to_string(), "Response status: 503");
    }

    #[test]
    fn test_stage_classification() {
        assert_eq!(UpdateError::FetchStatus(500).stage(), "fetch");
        assert_eq!(UpdateError::Decode("eof".into()).stage(), "fetch");
        assert_eq!(UpdateError::Extraction("no bindings".into()).stage(), "extract");
        assert_eq!(UpdateError::Insertion("busy".into()).stage(), "write");
        assert!(UpdateError::Network("reset".into()).is_remote());
        assert!(!UpdateError::Insertion("busy".into()).is_remote());
    }

    #[test]
    fn test_db_error_becomes_insertion_failure() {
        let err: UpdateError = DbError::Migration("boom".into()).into();
        assert!(matches!(err, UpdateError::Insertion(_)));
        assert!(err.to_string().contains("boom"));
    }
}
