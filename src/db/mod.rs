//! SQLite-backed store for the people dataset and the updater's run log.
//!
//! The database lives at `~/.heightsync/heightsync.db` unless configured
//! otherwise. `HeightDb` is the storage capability handed to every component
//! that reads or writes it; nothing reaches for a global connection.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;

pub mod entities;
pub mod fetch_logs;
pub mod locks;
pub mod types;
pub use types::*;

/// How long a connection waits on another process's write lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct HeightDb {
    conn: Connection,
}

impl HeightDb {
    /// Borrow the underlying connection for ad-hoc queries.
    pub fn conn_ref(&self) -> &Connection {
        &self.conn
    }

    /// Execute a closure within a SQLite transaction.
    /// Commits on Ok, rolls back on Err.
    ///
    /// `BEGIN IMMEDIATE` takes the database write lock up front, so at most one
    /// connection (in any process) is inside a closure at a time. The lock is
    /// released when the transaction ends, on every path.
    pub fn with_transaction<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Self) -> Result<T, DbError>,
    {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        match f(self) {
            Ok(val) => {
                if let Err(e) = self.conn.execute_batch("COMMIT") {
                    let _ = self.conn.execute_batch("ROLLBACK");
                    return Err(e.into());
                }
                Ok(val)
            }
            Err(e) => {
                let _ = self.conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }

    /// Open (or create) the database at the default location and apply the schema.
    pub fn open() -> Result<Self, DbError> {
        let path = Self::default_path()?;
        Self::open_at(path)
    }

    /// Open a database at an explicit path.
    pub fn open_at(path: PathBuf) -> Result<Self, DbError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(DbError::CreateDir)?;
            }
        }

        let conn = Connection::open(&path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        // WAL keeps the read path unblocked while an updater holds the write lock
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        crate::migrations::run_migrations(&conn).map_err(DbError::Migration)?;

        log::debug!("Opened database at {}", path.display());
        Ok(Self { conn })
    }

    /// Resolve the default database path: `~/.heightsync/heightsync.db`.
    pub fn default_path() -> Result<PathBuf, DbError> {
        let home = dirs::home_dir().ok_or(DbError::HomeDirNotFound)?;
        Ok(home.join(".heightsync").join("heightsync.db"))
    }

    /// Path of the main database file, as SQLite reports it.
    pub fn path(&self) -> Option<&Path> {
        self.conn.path().map(Path::new)
    }
}

// =============================================================================
// Shared test utilities
// =============================================================================

#[cfg(test)]
pub mod test_utils {
    use std::path::PathBuf;

    use super::HeightDb;

    /// Path to a fresh database file inside a leaked temp dir.
    ///
    /// The `TempDir` is leaked so the directory persists for the duration of
    /// the test; multiple `HeightDb`s can open the same path to play separate
    /// processes.
    pub fn test_db_path() -> PathBuf {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("test.db");
        std::mem::forget(dir);
        path
    }

    /// Create a temporary database for testing.
    pub fn test_db() -> HeightDb {
        HeightDb::open_at(test_db_path()).expect("Failed to open test database")
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::{test_db, test_db_path};
    use super::*;

    #[test]
    fn test_open_creates_tables() {
        let db = test_db();
        let count: i32 = db
            .conn
            .query_row("SELECT COUNT(*) FROM data", [], |row| row.get(0))
            .expect("data table should exist");
        assert_eq!(count, 0);

        let count: i32 = db
            .conn
            .query_row("SELECT COUNT(*) FROM wikidata_fetch_logs", [], |row| {
                row.get(0)
            })
            .expect("wikidata_fetch_logs table should exist");
        assert_eq!(count, 0);
    }

    #[test]
    fn test_open_creates_parent_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("deeper").join("heights.db");
        let db = HeightDb::open_at(path.clone()).expect("open nested");
        assert!(path.exists());
        assert!(db.path().is_some());
    }

    #[test]
    fn test_reopen_is_idempotent() {
        let path = test_db_path();
        drop(HeightDb::open_at(path.clone()).expect("first open"));
        HeightDb::open_at(path).expect("second open applies no migrations");
    }

    #[test]
    fn test_with_transaction_commits_on_ok() {
        let db = test_db();
        db.with_transaction(|tx| {
            tx.conn.execute(
                "INSERT INTO data (id, name, description, height, image)
                 VALUES ('Q1', 'A', 'B', 170, 'img')",
                [],
            )?;
            Ok(())
        })
        .expect("transaction");

        let count: i32 = db
            .conn
            .query_row("SELECT COUNT(*) FROM data", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_with_transaction_rolls_back_on_err() {
        let db = test_db();
        let result: Result<(), DbError> = db.with_transaction(|tx| {
            tx.conn.execute(
                "INSERT INTO data (id, name, description, height, image)
                 VALUES ('Q1', 'A', 'B', 170, 'img')",
                [],
            )?;
            Err(DbError::Migration("forced failure".to_string()))
        });
        assert!(result.is_err());

        let count: i32 = db
            .conn
            .query_row("SELECT COUNT(*) FROM data", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0, "insert must not survive a rollback");

        // The connection is usable again after rollback.
        db.with_transaction(|_| Ok(())).expect("new transaction");
    }
}
