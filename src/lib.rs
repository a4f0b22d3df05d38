//! Core library surface for the plate lookup TUI application.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as potential external tooling can reuse the same
//! pieces: open the registry, load the category index, search by plate, and
//! optionally drive the interactive front-end.
pub mod db;
pub mod models;
pub mod ui;

/// Convenience re-exports for the persistence layer. These functions are what
/// `main.rs` (and any programmatic caller) needs to query the registry
/// without touching the TUI.
pub use db::{fetch_categories, open_database, search_plates, SearchQuery, StoreError};

/// The record type every query hydrates.
pub use models::PlateRecord;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
