// Store queries — CRUD operations for the document and topic collections.
//
// Every store interaction goes through this module. This keeps SQL
// contained in one place and gives the rest of the app clean Rust
// interfaces. List-valued columns are JSON arrays.

use anyhow::Result;
use rusqlite::{params, Connection, Row, ToSql};

use super::models::{Document, DocumentUpdate, NewDocument, Topic};

const DOCUMENT_COLUMNS: &str = "id, story_id, title, content, genre, topics, topic_names, \
                                authors, year, doi, date_added, popularity";

/// Sort fields accepted by the list endpoint. Anything else falls back to
/// date_added — sort identifiers can't be bound as parameters, so they
/// must never come from the caller unchecked.
fn sort_column(requested: &str) -> &'static str {
    match requested {
        "title" => "title",
        "genre" => "genre",
        "popularity" => "popularity",
        "story_id" => "story_id",
        "year" => "year",
        _ => "date_added",
    }
}

fn map_document(row: &Row) -> rusqlite::Result<Document> {
    let topics_json: String = row.get(5)?;
    let topic_names_json: String = row.get(6)?;
    let authors_json: String = row.get(7)?;
    Ok(Document {
        id: row.get(0)?,
        story_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        genre: row.get(4)?,
        topics: serde_json::from_str(&topics_json).unwrap_or_default(),
        topic_names: serde_json::from_str(&topic_names_json).unwrap_or_default(),
        authors: serde_json::from_str(&authors_json).unwrap_or_default(),
        year: row.get(8)?,
        doi: row.get(9)?,
        date_added: row.get(10)?,
        popularity: row.get(11)?,
    })
}

fn map_topic(row: &Row) -> rusqlite::Result<Topic> {
    let keywords_json: String = row.get(2)?;
    let representative_json: String = row.get(4)?;
    Ok(Topic {
        topic_id: row.get(0)?,
        name: row.get(1)?,
        keywords: serde_json::from_str(&keywords_json).unwrap_or_default(),
        count: row.get(3)?,
        representative_docs: serde_json::from_str(&representative_json).unwrap_or_default(),
    })
}

// --- Documents ---

/// Insert a single document and return its store-assigned id.
pub fn insert_document(conn: &Connection, doc: &NewDocument) -> Result<i64> {
    conn.execute(
        "INSERT INTO documents
            (story_id, title, content, genre, topics, topic_names, authors,
             year, doi, date_added, popularity)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            doc.story_id,
            doc.title,
            doc.content,
            doc.genre,
            serde_json::to_string(&doc.topics)?,
            serde_json::to_string(&doc.topic_names)?,
            serde_json::to_string(&doc.authors)?,
            doc.year,
            doc.doi,
            doc.date_added,
            doc.popularity,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Insert a batch of documents in one transaction.
pub fn insert_documents(conn: &Connection, docs: &[NewDocument]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    for doc in docs {
        insert_document(&tx, doc)?;
    }
    tx.commit()?;
    Ok(docs.len())
}

/// List documents with sorting and pagination.
pub fn list_documents(
    conn: &Connection,
    sort_by: &str,
    descending: bool,
    skip: u32,
    limit: u32,
) -> Result<Vec<Document>> {
    let direction = if descending { "DESC" } else { "ASC" };
    let sql = format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents
         ORDER BY {} {direction}
         LIMIT ?1 OFFSET ?2",
        sort_column(sort_by),
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![limit, skip], map_document)?;

    let mut documents = Vec::new();
    for row in rows {
        documents.push(row?);
    }
    Ok(documents)
}

/// Load the entire document collection (bootstrap corpus scan).
pub fn all_documents(conn: &Connection) -> Result<Vec<Document>> {
    let mut stmt =
        conn.prepare(&format!("SELECT {DOCUMENT_COLUMNS} FROM documents ORDER BY id"))?;
    let rows = stmt.query_map([], map_document)?;

    let mut documents = Vec::new();
    for row in rows {
        documents.push(row?);
    }
    Ok(documents)
}

/// Fetch one document by its store id.
pub fn get_document(conn: &Connection, id: i64) -> Result<Option<Document>> {
    let mut stmt =
        conn.prepare(&format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1"))?;
    let result = stmt.query_row(params![id], map_document).optional()?;
    Ok(result)
}

/// Partially update a document ($set semantics — only supplied fields are
/// written). Returns false when no row matched the id.
pub fn update_document(conn: &Connection, id: i64, update: &DocumentUpdate) -> Result<bool> {
    let mut sets: Vec<String> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(ref v) = update.title {
        values.push(Box::new(v.clone()));
        sets.push(format!("title = ?{}", values.len()));
    }
    if let Some(ref v) = update.content {
        values.push(Box::new(v.clone()));
        sets.push(format!("content = ?{}", values.len()));
    }
    if let Some(ref v) = update.genre {
        values.push(Box::new(v.clone()));
        sets.push(format!("genre = ?{}", values.len()));
    }
    if let Some(ref v) = update.topics {
        values.push(Box::new(serde_json::to_string(v)?));
        sets.push(format!("topics = ?{}", values.len()));
    }
    if let Some(ref v) = update.topic_names {
        values.push(Box::new(serde_json::to_string(v)?));
        sets.push(format!("topic_names = ?{}", values.len()));
    }
    if let Some(ref v) = update.authors {
        values.push(Box::new(serde_json::to_string(v)?));
        sets.push(format!("authors = ?{}", values.len()));
    }
    if let Some(v) = update.year {
        values.push(Box::new(v));
        sets.push(format!("year = ?{}", values.len()));
    }
    if let Some(ref v) = update.doi {
        values.push(Box::new(v.clone()));
        sets.push(format!("doi = ?{}", values.len()));
    }

    if sets.is_empty() {
        anyhow::bail!("No fields to update");
    }

    values.push(Box::new(id));
    let sql = format!(
        "UPDATE documents SET {} WHERE id = ?{}",
        sets.join(", "),
        values.len()
    );
    let changed = conn.execute(
        &sql,
        rusqlite::params_from_iter(values.iter().map(|v| v.as_ref())),
    )?;
    Ok(changed > 0)
}

/// Overwrite a document's topic assignment (bootstrap re-scan).
pub fn set_document_topics(
    conn: &Connection,
    id: i64,
    topics: &[i64],
    topic_names: &[String],
) -> Result<()> {
    conn.execute(
        "UPDATE documents SET topics = ?1, topic_names = ?2 WHERE id = ?3",
        params![
            serde_json::to_string(topics)?,
            serde_json::to_string(topic_names)?,
            id
        ],
    )?;
    Ok(())
}

/// Delete one document. Returns false when the id didn't exist.
pub fn delete_document(conn: &Connection, id: i64) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM documents WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

/// Clear the document collection (CSV load / regeneration).
pub fn delete_all_documents(conn: &Connection) -> Result<usize> {
    let deleted = conn.execute("DELETE FROM documents", [])?;
    Ok(deleted)
}

pub fn count_documents(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
    Ok(count)
}

/// Full-text search over title + content, ranked by FTS relevance.
///
/// The raw query goes straight into MATCH, which rejects some user input
/// (unbalanced quotes, bare operators). When MATCH errors or finds
/// nothing, fall back to a substring scan over title, content, genre, and
/// topic_names — slower but forgiving.
pub fn search_documents(conn: &Connection, q: &str, skip: u32, limit: u32) -> Result<Vec<Document>> {
    if let Ok(documents) = search_fts(conn, q, skip, limit) {
        if !documents.is_empty() {
            return Ok(documents);
        }
    }
    search_like(conn, q, skip, limit)
}

fn search_fts(conn: &Connection, q: &str, skip: u32, limit: u32) -> Result<Vec<Document>> {
    let sql = format!(
        "SELECT {} FROM documents_fts
         JOIN documents d ON d.id = documents_fts.rowid
         WHERE documents_fts MATCH ?1
         ORDER BY documents_fts.rank
         LIMIT ?2 OFFSET ?3",
        document_columns_qualified("d"),
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![q, limit, skip], map_document)?;

    let mut documents = Vec::new();
    for row in rows {
        documents.push(row?);
    }
    Ok(documents)
}

fn search_like(conn: &Connection, q: &str, skip: u32, limit: u32) -> Result<Vec<Document>> {
    let pattern = format!("%{q}%");
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents
         WHERE title LIKE ?1 OR content LIKE ?1 OR genre LIKE ?1 OR topic_names LIKE ?1
         ORDER BY id
         LIMIT ?2 OFFSET ?3"
    ))?;
    let rows = stmt.query_map(params![pattern, limit, skip], map_document)?;

    let mut documents = Vec::new();
    for row in rows {
        documents.push(row?);
    }
    Ok(documents)
}

fn document_columns_qualified(alias: &str) -> String {
    DOCUMENT_COLUMNS
        .split(", ")
        .map(|col| format!("{alias}.{}", col.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Documents whose topics array contains the given topic id.
pub fn documents_by_topic(
    conn: &Connection,
    topic_id: i64,
    skip: u32,
    limit: u32,
) -> Result<Vec<Document>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents
         WHERE EXISTS (SELECT 1 FROM json_each(documents.topics) WHERE json_each.value = ?1)
         ORDER BY id
         LIMIT ?2 OFFSET ?3"
    ))?;
    let rows = stmt.query_map(params![topic_id, limit, skip], map_document)?;

    let mut documents = Vec::new();
    for row in rows {
        documents.push(row?);
    }
    Ok(documents)
}

pub fn count_documents_by_topic(conn: &Connection, topic_id: i64) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM documents
         WHERE EXISTS (SELECT 1 FROM json_each(documents.topics) WHERE json_each.value = ?1)",
        params![topic_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

// --- Topics ---

/// Insert a batch of topics in one transaction, preserving input order.
pub fn insert_topics(conn: &Connection, topics: &[Topic]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    for topic in topics {
        tx.execute(
            "INSERT INTO topics (topic_id, name, keywords, count, representative_docs)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                topic.topic_id,
                topic.name,
                serde_json::to_string(&topic.keywords)?,
                topic.count,
                serde_json::to_string(&topic.representative_docs)?,
            ],
        )?;
    }
    tx.commit()?;
    Ok(topics.len())
}

/// Load the entire taxonomy in stored order (the matcher iterates it).
pub fn all_topics(conn: &Connection) -> Result<Vec<Topic>> {
    let mut stmt = conn.prepare(
        "SELECT topic_id, name, keywords, count, representative_docs
         FROM topics
         ORDER BY id",
    )?;
    let rows = stmt.query_map([], map_topic)?;

    let mut topics = Vec::new();
    for row in rows {
        topics.push(row?);
    }
    Ok(topics)
}

/// List topics in stored (insertion) order with pagination.
pub fn list_topics(conn: &Connection, skip: u32, limit: u32) -> Result<Vec<Topic>> {
    let mut stmt = conn.prepare(
        "SELECT topic_id, name, keywords, count, representative_docs
         FROM topics
         ORDER BY id
         LIMIT ?1 OFFSET ?2",
    )?;
    let rows = stmt.query_map(params![limit, skip], map_topic)?;

    let mut topics = Vec::new();
    for row in rows {
        topics.push(row?);
    }
    Ok(topics)
}

/// Fetch one topic by its dense topic id.
pub fn get_topic(conn: &Connection, topic_id: i64) -> Result<Option<Topic>> {
    let mut stmt = conn.prepare(
        "SELECT topic_id, name, keywords, count, representative_docs
         FROM topics
         WHERE topic_id = ?1",
    )?;
    let result = stmt.query_row(params![topic_id], map_topic).optional()?;
    Ok(result)
}

pub fn count_topics(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM topics", [], |row| row.get(0))?;
    Ok(count)
}

/// Clear the topic collection (regeneration).
pub fn delete_all_topics(conn: &Connection) -> Result<usize> {
    let deleted = conn.execute("DELETE FROM topics", [])?;
    Ok(deleted)
}

// rusqlite's optional() helper — converts "no rows" into None
use rusqlite::OptionalExtension;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::create_tables;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    fn story(title: &str, content: &str) -> NewDocument {
        NewDocument {
            story_id: 0,
            title: title.to_string(),
            content: content.to_string(),
            genre: "General".to_string(),
            topics: vec![],
            topic_names: vec![],
            authors: vec![],
            year: None,
            doi: None,
            date_added: "2024-01-01T00:00:00+00:00".to_string(),
            popularity: 0,
        }
    }

    #[test]
    fn test_insert_and_get_document() {
        let conn = test_conn();
        let id = insert_document(&conn, &story("The Harbor", "Boats waited in the fog")).unwrap();
        assert!(id > 0);

        let doc = get_document(&conn, id).unwrap().unwrap();
        assert_eq!(doc.title, "The Harbor");
        assert_eq!(doc.genre, "General");
        assert!(doc.topics.is_empty());

        assert!(get_document(&conn, id + 999).unwrap().is_none());
    }

    #[test]
    fn test_update_document_partial() {
        let conn = test_conn();
        let id = insert_document(&conn, &story("Draft", "First version")).unwrap();

        let update = DocumentUpdate {
            title: Some("Final".to_string()),
            topics: Some(vec![1, 2]),
            ..Default::default()
        };
        assert!(update_document(&conn, id, &update).unwrap());

        let doc = get_document(&conn, id).unwrap().unwrap();
        assert_eq!(doc.title, "Final");
        assert_eq!(doc.topics, vec![1, 2]);
        // Untouched fields survive
        assert_eq!(doc.content, "First version");

        // Unknown id matches nothing
        assert!(!update_document(&conn, id + 999, &update).unwrap());
    }

    #[test]
    fn test_update_document_empty_bails() {
        let conn = test_conn();
        let id = insert_document(&conn, &story("A", "B")).unwrap();
        let result = update_document(&conn, id, &DocumentUpdate::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_list_documents_sort_and_pagination() {
        let conn = test_conn();
        for i in 0..5 {
            let mut doc = story(&format!("Story {i}"), "text");
            doc.popularity = i;
            insert_document(&conn, &doc).unwrap();
        }

        let page = list_documents(&conn, "popularity", true, 0, 2).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].popularity, 4);

        let page = list_documents(&conn, "popularity", true, 2, 2).unwrap();
        assert_eq!(page[0].popularity, 2);

        // Unknown sort field falls back to date_added without erroring
        let page = list_documents(&conn, "'; DROP TABLE documents; --", true, 0, 10).unwrap();
        assert_eq!(page.len(), 5);
    }

    #[test]
    fn test_search_fts_and_fallback() {
        let conn = test_conn();
        insert_document(&conn, &story("The Lighthouse", "A keeper watches the storm")).unwrap();
        insert_document(&conn, &story("Desert Road", "Dust and heat and silence")).unwrap();

        let hits = search_documents(&conn, "lighthouse", 0, 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "The Lighthouse");

        // Genre isn't in the FTS index — the LIKE fallback finds it
        let hits = search_documents(&conn, "General", 0, 10).unwrap();
        assert_eq!(hits.len(), 2);

        // Broken MATCH syntax falls back instead of erroring
        let hits = search_documents(&conn, "\"unbalanced", 0, 10).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_documents_by_topic() {
        let conn = test_conn();
        let mut tagged = story("Tagged", "text");
        tagged.topics = vec![1, 12];
        insert_document(&conn, &tagged).unwrap();
        insert_document(&conn, &story("Untagged", "text")).unwrap();

        let hits = documents_by_topic(&conn, 1, 0, 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Tagged");
        assert_eq!(count_documents_by_topic(&conn, 1).unwrap(), 1);

        // Topic 2 must not match the JSON text of [1, 12]
        assert!(documents_by_topic(&conn, 2, 0, 10).unwrap().is_empty());
    }

    #[test]
    fn test_topics_roundtrip() {
        let conn = test_conn();
        let topics = vec![
            Topic {
                topic_id: 0,
                name: "Forest".to_string(),
                keywords: vec!["forest".to_string()],
                count: 12,
                representative_docs: vec![],
            },
            Topic {
                topic_id: 1,
                name: "Ocean".to_string(),
                keywords: vec!["ocean".to_string()],
                count: 9,
                representative_docs: vec![],
            },
        ];
        assert_eq!(insert_topics(&conn, &topics).unwrap(), 2);
        assert_eq!(count_topics(&conn).unwrap(), 2);

        let listed = list_topics(&conn, 0, 10).unwrap();
        assert_eq!(listed.len(), 2);
        // Stored order preserved
        assert_eq!(listed[0].topic_id, 0);
        assert_eq!(listed[1].name, "Ocean");

        let one = get_topic(&conn, 1).unwrap().unwrap();
        assert_eq!(one.keywords, vec!["ocean"]);
        assert!(get_topic(&conn, 42).unwrap().is_none());

        assert_eq!(delete_all_topics(&conn).unwrap(), 2);
        assert_eq!(count_topics(&conn).unwrap(), 0);
    }
}
