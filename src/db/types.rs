//! Shared type definitions for the database layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors specific to database operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to create database directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Schema migration failed: {0}")]
    Migration(String),

    #[error("Invalid entity id: {0}")]
    InvalidId(String),

    #[error("Advisory lock {0} requested outside a transaction")]
    LockOutsideTransaction(i64),
}

/// A row from the `data` table: one notable person.
///
/// Every field is non-empty and `height` is a positive number of centimeters.
/// Rows are never rewritten once stored; a later run can only add new ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Wikidata identifier, e.g. `Q76`.
    pub id: String,
    pub name: String,
    pub description: String,
    pub height: i64,
    pub image: String,
}

/// Outcome of a single updater run, appended to `wikidata_fetch_logs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRun {
    pub successful: bool,
    /// Records extracted from the remote payload, before deduplication.
    pub entries_fetched: i64,
    /// Rows actually inserted into `data`.
    pub entries_added: i64,
    pub duration_seconds: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// A persisted `wikidata_fetch_logs` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbFetchLog {
    pub id: i64,
    #[serde(flatten)]
    pub run: FetchRun,
    pub timestamp: String,
}
