//! Decide whether a new fetch is due.
//!
//! The read is unlocked: two processes may both decide a run is due, which at
//! worst costs a redundant fetch since the write side is idempotent.

use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::db::HeightDb;
use crate::error::UpdateError;

/// Format SQLite's `datetime('now')` writes.
const SQLITE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a stored log timestamp (SQLite datetime or RFC 3339).
pub fn parse_log_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, SQLITE_DATETIME_FORMAT) {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_stored(raw: &str) -> Result<DateTime<Utc>, UpdateError> {
    parse_log_timestamp(raw)
        .ok_or_else(|| UpdateError::Staleness(format!("unreadable fetch log timestamp {:?}", raw)))
}

/// Whether more than `period` has passed since the last run.
///
/// - No previous run: due.
/// - Storage read fails: not due (skip this cycle), logged as a warning.
/// - Stored timestamp is unreadable: `Err`, the caller records a failed run.
pub fn is_update_due(
    db: &HeightDb,
    period: Duration,
    now: DateTime<Utc>,
) -> Result<bool, UpdateError> {
    let raw = match db.get_last_fetch_timestamp() {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("Getting last Wikidata fetch date failed: {}", e);
            return Ok(false);
        }
    };

    let last = match raw {
        None => return Ok(true),
        Some(raw) => parse_stored(&raw)?,
    };

    let elapsed = now.signed_duration_since(last);
    match chrono::Duration::from_std(period) {
        Ok(period) => Ok(elapsed > period),
        // Out of chrono's range: never stale
        Err(_) => Ok(false),
    }
}
