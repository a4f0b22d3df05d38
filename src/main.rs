//! Binary entry point that glues the read-only registry store to the TUI.
//! Summarizing the bootstrapping pipeline here keeps the intent obvious when
//! revisiting the code: we resolve the database path, open it read-only, and
//! drive the Ratatui event loop until the user exits.
use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;

use plate_lookup::{open_database, run_app, App};

/// Environment variable consulted when no path argument is given.
const DB_PATH_VAR: &str = "PLATE_LOOKUP_DB";
/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".plate-lookup";
/// SQLite file name expected inside the application data directory.
const DB_FILE_NAME: &str = "plates.db";

/// Resolve the registry location, open it, and launch the event loop.
///
/// Returning a `Result` bubbles up fatal initialization problems (most
/// commonly a missing or unreadable registry file) to the terminal instead of
/// crashing silently.
fn main() -> Result<()> {
    let path = resolve_db_path().context("could not determine the registry database path")?;
    let conn = open_database(&path)?;

    let mut app = App::new(conn);
    run_app(&mut app)
}

/// The registry path is the only configuration point. Lookup order: first CLI
/// argument, then `PLATE_LOOKUP_DB`, then `plates.db` inside the application
/// data directory in the user's home.
fn resolve_db_path() -> Result<PathBuf> {
    if let Some(arg) = env::args_os().nth(1) {
        return Ok(PathBuf::from(arg));
    }
    if let Some(var) = env::var_os(DB_PATH_VAR) {
        return Ok(PathBuf::from(var));
    }

    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}
