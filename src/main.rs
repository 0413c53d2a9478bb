//! heightsync binary: refresh the people dataset once, then exit.
//!
//! Usage: `heightsync` (configure with `DATABASE_UPDATE_PERIOD`,
//! `HEIGHTSYNC_DB_PATH`, `RUST_LOG`).

use std::process::ExitCode;
use std::sync::Arc;

use parking_lot::Mutex;

use heightsync_lib::config::load_config;
use heightsync_lib::db::HeightDb;
use heightsync_lib::updater::{spawn_updater, UpdateOutcome, Updater};
use heightsync_lib::wikidata::client::WikidataClient;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let db = match config.database_path.clone() {
        Some(path) => HeightDb::open_at(path),
        None => HeightDb::open(),
    };
    let db = match db {
        Ok(db) => db,
        Err(e) => {
            log::error!("Failed to open database: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let updater = Updater::new(
        Arc::new(Mutex::new(db)),
        Arc::new(WikidataClient::new()),
        config,
    );

    match spawn_updater(updater).await {
        Ok(UpdateOutcome::Failed { .. }) => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Updater task aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}
