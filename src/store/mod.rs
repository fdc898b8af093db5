// Store layer — SQLite persistence for documents and topics.
//
// We use rusqlite with the "bundled" feature so there's no system SQLite
// dependency. The database file lives wherever STORYKEEP_DB_PATH points
// (defaults to ./storykeep.db).

pub mod models;
pub mod queries;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use sqlite::SqliteStore;
pub use traits::Store;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Open (or create) the store and run migrations.
///
/// This is the main entry point — called by `storykeep init` and by any
/// command that needs store access.
pub fn initialize(db_path: &str) -> Result<Arc<dyn Store>> {
    // Create parent directories if needed
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for store: {}", db_path))?;
        }
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open store at {}", db_path))?;

    // Enable WAL mode for better concurrent read performance
    conn.pragma_update(None, "journal_mode", "WAL")?;

    schema::create_tables(&conn)?;

    Ok(Arc::new(SqliteStore::new(conn)))
}

/// Open an existing store (fails if it doesn't exist yet).
pub fn open(db_path: &str) -> Result<Arc<dyn Store>> {
    if !Path::new(db_path).exists() {
        anyhow::bail!(
            "Store not found at {}. Run `storykeep init` first.",
            db_path
        );
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open store at {}", db_path))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;

    // Schema creation is idempotent — run it so older files pick up new
    // tables and indexes.
    schema::create_tables(&conn)?;

    Ok(Arc::new(SqliteStore::new(conn)))
}

/// In-memory store for tests and throwaway runs.
pub fn open_in_memory() -> Result<Arc<dyn Store>> {
    let conn = Connection::open_in_memory().context("Failed to open in-memory store")?;
    schema::create_tables(&conn)?;
    Ok(Arc::new(SqliteStore::new(conn)))
}
