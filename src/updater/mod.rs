//! Dataset updater: one run per process start.
//!
//! Stages run strictly in order:
//! CheckingStaleness → Fetching → Extracting → Deduplicating → Writing.
//! A run that is not due ends silently (`Skipped`). Every other run appends
//! exactly one `wikidata_fetch_logs` row, whether it succeeded or not.
//!
//! The orchestrator never returns an error: failures below it are caught once
//! here and recorded in the run's `error_message`.

pub mod dedupe;
pub mod extract;
pub mod normalize;
pub mod staleness;
pub mod writer;

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;

use crate::config::UpdaterConfig;
use crate::db::{FetchRun, HeightDb};
use crate::error::UpdateError;
use crate::helpers::elapsed_seconds;
use crate::wikidata::client::DataSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStage {
    CheckingStaleness,
    Fetching,
    Extracting,
    Deduplicating,
    Writing,
}

impl fmt::Display for UpdateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UpdateStage::CheckingStaleness => "checking staleness",
            UpdateStage::Fetching => "fetching",
            UpdateStage::Extracting => "extracting",
            UpdateStage::Deduplicating => "deduplicating",
            UpdateStage::Writing => "writing",
        };
        f.write_str(name)
    }
}

/// Terminal state of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Not due yet; nothing fetched, nothing logged.
    Skipped,
    Succeeded { run: FetchRun, log_persisted: bool },
    Failed { run: FetchRun, log_persisted: bool },
}

impl UpdateOutcome {
    pub fn run(&self) -> Option<&FetchRun> {
        match self {
            UpdateOutcome::Skipped => None,
            UpdateOutcome::Succeeded { run, .. } | UpdateOutcome::Failed { run, .. } => Some(run),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, UpdateOutcome::Failed { .. })
    }
}

pub struct Updater {
    db: Arc<Mutex<HeightDb>>,
    source: Arc<dyn DataSource>,
    config: UpdaterConfig,
}

impl Updater {
    pub fn new(db: Arc<Mutex<HeightDb>>, source: Arc<dyn DataSource>, config: UpdaterConfig) -> Self {
        Self { db, source, config }
    }

    /// Run the pipeline once. Always completes; see `UpdateOutcome`.
    pub async fn run(&self) -> UpdateOutcome {
        let start = Utc::now();
        let mut run = FetchRun::default();

        log::debug!("Updater: {}", UpdateStage::CheckingStaleness);
        let due = {
            let db = self.db.lock();
            staleness::is_update_due(&db, self.config.update_period(), start)
        };

        match due {
            Ok(true) => {}
            Ok(false) => {
                log::info!("Update not needed. Exiting the updater.");
                return UpdateOutcome::Skipped;
            }
            Err(e) => {
                log::error!("Updater failed while {}: {}", UpdateStage::CheckingStaleness, e);
                run.error_message = Some(e.to_string());
                return self.finish(run, start);
            }
        }

        if let Err(e) = self.fetch_and_store(&mut run).await {
            if e.is_remote() {
                log::warn!("Updater: remote source failed ({} stage): {}", e.stage(), e);
            } else {
                log::error!("Updater: {} stage failed: {}", e.stage(), e);
            }
            run.error_message = Some(e.to_string());
        }

        self.finish(run, start)
    }

    /// Fetching → Extracting → Deduplicating → Writing. Fills the counters on `run`.
    async fn fetch_and_store(&self, run: &mut FetchRun) -> Result<(), UpdateError> {
        log::debug!("Updater: {}", UpdateStage::Fetching);
        let response = self.source.fetch().await?;

        log::debug!("Updater: {}", UpdateStage::Extracting);
        let entities = extract::extract_entities(&response)?;
        run.entries_fetched = entities.len() as i64;

        log::debug!("Updater: {}", UpdateStage::Deduplicating);
        let entities = dedupe::dedupe_by_height(entities);

        log::debug!("Updater: {} {} entities", UpdateStage::Writing, entities.len());
        let added = {
            let db = self.db.lock();
            writer::insert_entities(&db, &entities)?
        };
        run.entries_added = added as i64;
        run.successful = true;
        Ok(())
    }

    fn finish(&self, mut run: FetchRun, start: chrono::DateTime<Utc>) -> UpdateOutcome {
        run.duration_seconds = elapsed_seconds(start, Utc::now());

        let log_persisted = {
            let db = self.db.lock();
            writer::record_fetch_run(&db, &run)
        };

        if run.successful {
            log::info!(
                "Updated the database successfully: {} fetched, {} added in {}s",
                run.entries_fetched,
                run.entries_added,
                run.duration_seconds
            );
            UpdateOutcome::Succeeded { run, log_persisted }
        } else {
            log::error!("Database update failed.");
            UpdateOutcome::Failed { run, log_persisted }
        }
    }
}

/// Start a run in the background. Bootstrap may await the handle or drop it.
pub fn spawn_updater(updater: Updater) -> tokio::task::JoinHandle<UpdateOutcome> {
    tokio::spawn(async move { updater.run().await })
}
