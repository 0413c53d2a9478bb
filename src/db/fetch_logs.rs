//! `wikidata_fetch_logs`: append-only record of updater runs.

use rusqlite::{params, OptionalExtension};

use super::*;

impl HeightDb {
    /// Append one run record. The row's timestamp defaults to now.
    pub fn append_fetch_log(&self, run: &FetchRun) -> Result<i64, DbError> {
        self.conn.execute(
            "INSERT INTO wikidata_fetch_logs
             (successful, entries_fetched, entries_added, duration_seconds, error_message)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                run.successful,
                run.entries_fetched,
                run.entries_added,
                run.duration_seconds,
                run.error_message,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Timestamp of the most recent run, as stored (`YYYY-MM-DD HH:MM:SS`, UTC).
    pub fn get_last_fetch_timestamp(&self) -> Result<Option<String>, DbError> {
        Ok(self
            .conn
            .query_row(
                "SELECT timestamp FROM wikidata_fetch_logs ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?)
    }

    /// Newest-first run records.
    pub fn get_recent_fetch_logs(&self, limit: usize) -> Result<Vec<DbFetchLog>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, successful, entries_fetched, entries_added, duration_seconds,
                    error_message, timestamp
             FROM wikidata_fetch_logs
             ORDER BY id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(DbFetchLog {
                id: row.get(0)?,
                run: FetchRun {
                    successful: row.get(1)?,
                    entries_fetched: row.get(2)?,
                    entries_added: row.get(3)?,
                    duration_seconds: row.get(4)?,
                    error_message: row.get(5)?,
                },
                timestamp: row.get(6)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::test_db;

    #[test]
    fn test_no_logs_yet() {
        let db = test_db();
        assert!(db.get_last_fetch_timestamp().expect("query").is_none());
        assert!(db.get_recent_fetch_logs(5).expect("query").is_empty());
    }

    #[test]
    fn test_append_and_read_back() {
        let db = test_db();
        let ok = FetchRun {
            successful: true,
            entries_fetched: 310,
            entries_added: 287,
            duration_seconds: 4,
            error_message: None,
        };
        let failed = FetchRun {
            successful: false,
            error_message: Some("Response status: 503".to_string()),
            ..Default::default()
        };
        db.append_fetch_log(&ok).expect("append ok");
        db.append_fetch_log(&failed).expect("append failed");

        let logs = db.get_recent_fetch_logs(10).expect("query");
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].run, failed, "newest first");
        assert_eq!(logs[1].run, ok);
        assert!(logs[0].id > logs[1].id);
    }

    #[test]
    fn test_last_timestamp_follows_id_order() {
        let db = test_db();
        db.conn_ref()
            .execute(
                "INSERT INTO wikidata_fetch_logs (successful, timestamp)
                 VALUES (1, '2030-01-01 00:00:00')",
                [],
            )
            .unwrap();
        db.conn_ref()
            .execute(
                "INSERT INTO wikidata_fetch_logs (successful, timestamp)
                 VALUES (0, '2020-06-15 12:30:00')",
                [],
            )
            .unwrap();

        let last = db.get_last_fetch_timestamp().expect("query");
        assert_eq!(last.as_deref(), Some("2020-06-15 12:30:00"));
    }
}
