//! heightsync: keeps a local SQLite table of notable people and their heights
//! in sync with Wikidata.
//!
//! The updater (`updater::Updater`) decides whether a refresh is due, pulls the
//! SPARQL results, normalizes and deduplicates them, and inserts new people
//! under a transaction-scoped lock. Each run that goes past the staleness check
//! leaves one row in `wikidata_fetch_logs`.

pub mod config;
pub mod db;
pub mod error;
pub mod helpers;
mod migrations;
pub mod updater;
pub mod wikidata;
