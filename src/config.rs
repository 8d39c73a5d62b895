//! Configuration for the evaltrack binary
//!
//! The database path resolves from the CLI flag, then the environment, then
//! a per-user data directory default.

use std::path::PathBuf;

/// Environment variable overriding the database location
pub const DB_PATH_ENV: &str = "EVALTRACK_DB_PATH";

/// Get the default database path under the user data directory
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("evaltrack")
        .join("evaltrack.db")
}

/// Resolve the database path from CLI arg, env var, or default
pub fn resolve_db_path(cli_path: Option<PathBuf>) -> PathBuf {
    cli_path
        .or_else(|| std::env::var(DB_PATH_ENV).ok().map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}
