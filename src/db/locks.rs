//! Named, transaction-scoped mutual exclusion.
//!
//! SQLite has no advisory lock primitive, so a lock is a sentinel row in
//! `advisory_locks` written inside a `BEGIN IMMEDIATE` transaction. The write
//! lock that transaction holds is what excludes other writers; the sentinel row
//! names the critical section and records who last held it. Release happens
//! when the transaction commits or rolls back.

use rusqlite::params;

use super::*;

/// Key for the bulk insert into `data`. Shared by every deployed instance.
pub const ENTITY_INSERTION_LOCK_KEY: i64 = 7_200_001;

impl HeightDb {
    /// Take the lock identified by `key` for the rest of the current transaction.
    pub fn acquire_advisory_lock(&self, key: i64, name: &str) -> Result<(), DbError> {
        if self.conn.is_autocommit() {
            return Err(DbError::LockOutsideTransaction(key));
        }
        let holder = format!("pid:{}", std::process::id());
        self.conn.execute(
            "INSERT INTO advisory_locks (key, name, holder, acquired_at)
             VALUES (?1, ?2, ?3, datetime('now'))
             ON CONFLICT (key) DO UPDATE SET
                name = excluded.name,
                holder = excluded.holder,
                acquired_at = excluded.acquired_at",
            params![key, name, holder],
        )?;
        log::debug!("Acquired advisory lock {} ({})", key, name);
        Ok(())
    }
}
