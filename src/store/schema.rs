// Store schema — table creation and migrations.
//
// A `schema_version` table tracks which schema revisions have been applied,
// so future migrations can run exactly once. Everything here is idempotent
// and executes on every startup.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables and indexes if they don't exist yet.
///
/// This is idempotent — safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- Tracks schema version for future migrations
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Short-story documents. List-valued fields are JSON arrays so the
        -- shapes can evolve without migrations.
        CREATE TABLE IF NOT EXISTS documents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            story_id INTEGER NOT NULL DEFAULT 0,   -- provider id, 0 = user-created
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            genre TEXT NOT NULL DEFAULT 'General',
            topics TEXT NOT NULL DEFAULT '[]',      -- JSON array of topic ids (max 3)
            topic_names TEXT NOT NULL DEFAULT '[]', -- JSON array of display names
            authors TEXT NOT NULL DEFAULT '[]',     -- JSON array
            year INTEGER,
            doi TEXT,
            date_added TEXT NOT NULL DEFAULT (datetime('now')),
            popularity INTEGER NOT NULL DEFAULT 0
        );

        -- Topic taxonomy. topic_id is dense within a generation; the table
        -- is cleared before regeneration, so no uniqueness constraint.
        CREATE TABLE IF NOT EXISTS topics (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            topic_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            keywords TEXT NOT NULL DEFAULT '[]',    -- JSON array, most characteristic first
            count INTEGER NOT NULL DEFAULT 0,
            representative_docs TEXT NOT NULL DEFAULT '[]'  -- reserved, always empty
        );

        -- Index for find-one by dense topic id
        CREATE INDEX IF NOT EXISTS idx_topics_topic_id
            ON topics(topic_id);

        -- Simple indexes over the JSON topic columns
        CREATE INDEX IF NOT EXISTS idx_documents_topics
            ON documents(topics);
        CREATE INDEX IF NOT EXISTS idx_documents_topic_names
            ON documents(topic_names);

        -- Full-text index over title + content (external content table,
        -- kept in sync by the triggers below)
        CREATE VIRTUAL TABLE IF NOT EXISTS documents_fts USING fts5(
            title, content,
            content='documents',
            content_rowid='id'
        );

        CREATE TRIGGER IF NOT EXISTS documents_fts_insert
        AFTER INSERT ON documents BEGIN
            INSERT INTO documents_fts(rowid, title, content)
            VALUES (new.id, new.title, new.content);
        END;

        CREATE TRIGGER IF NOT EXISTS documents_fts_delete
        AFTER DELETE ON documents BEGIN
            INSERT INTO documents_fts(documents_fts, rowid, title, content)
            VALUES ('delete', old.id, old.title, old.content);
        END;

        CREATE TRIGGER IF NOT EXISTS documents_fts_update
        AFTER UPDATE ON documents BEGIN
            INSERT INTO documents_fts(documents_fts, rowid, title, content)
            VALUES ('delete', old.id, old.title, old.content);
            INSERT INTO documents_fts(rowid, title, content)
            VALUES (new.id, new.title, new.content);
        END;
        ",
    )
    .context("Failed to create store tables")?;

    // Record initial schema version if not already set
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    Ok(())
}

/// Count the user-created tables (useful for init confirmation).
/// FTS5 shadow tables are excluded — they're an implementation detail.
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master
         WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name NOT LIKE 'documents_fts%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        // Running create_tables twice should not error
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();
    }

    #[test]
    fn test_table_count() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        let count = table_count(&conn).unwrap();
        // schema_version, documents, topics = 3 tables
        assert_eq!(count, 3i64);
    }

    #[test]
    fn test_fts_triggers_track_documents() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        conn.execute(
            "INSERT INTO documents (title, content) VALUES ('The Lighthouse', 'A keeper watches the storm')",
            [],
        )
        .unwrap();

        let hits: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM documents_fts WHERE documents_fts MATCH 'lighthouse'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(hits, 1);

        conn.execute("DELETE FROM documents", []).unwrap();
        let hits: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM documents_fts WHERE documents_fts MATCH 'lighthouse'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(hits, 0);
    }
}
