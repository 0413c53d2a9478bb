//! Persist a run's results: the locked bulk insert and the run log entry.

use crate::db::locks::ENTITY_INSERTION_LOCK_KEY;
use crate::db::{Entity, FetchRun, HeightDb};
use crate::error::UpdateError;

const ENTITY_INSERTION_LOCK_NAME: &str = "entity insertion";

/// Insert new entities under the entity-insertion lock.
///
/// Ids already in `data` are skipped, never overwritten. All rows land or none
/// do: the insert runs in one transaction that also holds the lock. Returns the
/// number of rows actually inserted.
pub fn insert_entities(db: &HeightDb, entities: &[Entity]) -> Result<usize, UpdateError> {
    if entities.is_empty() {
        return Ok(0);
    }

    db.with_transaction(|tx| {
        tx.acquire_advisory_lock(ENTITY_INSERTION_LOCK_KEY, ENTITY_INSERTION_LOCK_NAME)?;
        tx.insert_entities_skip_existing(entities)
    })
    .map_err(UpdateError::from)
}

/// Append the run record. Best effort: a failure is logged and reported via
/// the return value, never raised, so it cannot change the run's outcome.
pub fn record_fetch_run(db: &HeightDb, run: &FetchRun) -> bool {
    match db.append_fetch_log(run) {
        Ok(id) => {
            log::debug!("Recorded fetch log #{}", id);
            true
        }
        Err(e) => {
            log::error!("Failed to record fetch log ({:?}): {}", run, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::test_db;

    fn person(id: &str) -> Entity {
        Entity {
            id: id.to_string(),
            name: format!("Person {}", id),
            description: "Actor".to_string(),
            height: 175,
            image: "http://img".to_string(),
        }
    }

    #[test]
    fn test_empty_input_executes_nothing() {
        let db = test_db();
        db.conn_ref().execute_batch("DROP TABLE data").unwrap();

        // With no table, any statement would fail; an empty batch never gets there.
        assert_eq!(insert_entities(&db, &[]).expect("no-op"), 0);
    }

    #[test]
    fn test_overlapping_batches_insert_each_id_once() {
        let db = test_db();
        let first = insert_entities(&db, &[person("Q1"), person("Q2"), person("Q3")]).unwrap();
        assert_eq!(first, 3);

        let second = insert_entities(&db, &[person("Q2"), person("Q3"), person("Q4")]).unwrap();
        assert_eq!(second, 1, "only Q4 is new");

        assert_eq!(db.count_entities().unwrap(), 4);
    }

    #[test]
    fn test_failed_batch_leaves_no_rows() {
        let db = test_db();
        let mut bad = person("Q2");
        bad.height = -5; // violates CHECK (height > 0)

        let err = insert_entities(&db, &[person("Q1"), bad]).unwrap_err();
        assert!(matches!(err, UpdateError::Insertion(_)));
        assert_eq!(db.count_entities().unwrap(), 0, "no partial insert");

        // Transaction (and lock) released: a later batch goes through.
        assert_eq!(insert_entities(&db, &[person("Q1")]).unwrap(), 1);
    }

    #[test]
    fn test_record_fetch_run() {
        let db = test_db();
        let run = FetchRun {
            successful: true,
            entries_fetched: 3,
            entries_added: 2,
            duration_seconds: 1,
            error_message: None,
        };
        assert!(record_fetch_run(&db, &run));
        let logs = db.get_recent_fetch_logs(1).unwrap();
        assert_eq!(logs[0].run, run);
    }

    #[test]
    fn test_record_fetch_run_failure_is_swallowed() {
        let db = test_db();
        db.conn_ref()
            .execute_batch("DROP TABLE wikidata_fetch_logs")
            .unwrap();
        assert!(!record_fetch_run(&db, &FetchRun::default()));
    }
}
