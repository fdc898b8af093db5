// SqliteStore — rusqlite backend implementing the Store trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Send.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// The lock is never held across .await points — Rust enforces this because
// MutexGuard is !Send.
//
// The free functions in queries.rs remain standalone so unit tests can run
// against a Connection directly.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{Document, DocumentUpdate, NewDocument, Topic};
use super::traits::Store;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn insert_document(&self, doc: &NewDocument) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::insert_document(&conn, doc)
    }

    async fn insert_documents(&self, docs: &[NewDocument]) -> Result<usize> {
        let conn = self.conn.lock().await;
        super::queries::insert_documents(&conn, docs)
    }

    async fn list_documents(
        &self,
        sort_by: &str,
        descending: bool,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Document>> {
        let conn = self.conn.lock().await;
        super::queries::list_documents(&conn, sort_by, descending, skip, limit)
    }

    async fn all_documents(&self) -> Result<Vec<Document>> {
        let conn = self.conn.lock().await;
        super::queries::all_documents(&conn)
    }

    async fn get_document(&self, id: i64) -> Result<Option<Document>> {
        let conn = self.conn.lock().await;
        super::queries::get_document(&conn, id)
    }

    async fn update_document(&self, id: i64, update: &DocumentUpdate) -> Result<bool> {
        let conn = self.conn.lock().await;
        super::queries::update_document(&conn, id, update)
    }

    async fn set_document_topics(
        &self,
        id: i64,
        topics: &[i64],
        topic_names: &[String],
    ) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::set_document_topics(&conn, id, topics, topic_names)
    }

    async fn delete_document(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().await;
        super::queries::delete_document(&conn, id)
    }

    async fn delete_all_documents(&self) -> Result<usize> {
        let conn = self.conn.lock().await;
        super::queries::delete_all_documents(&conn)
    }

    async fn count_documents(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::count_documents(&conn)
    }

    async fn search_documents(&self, q: &str, skip: u32, limit: u32) -> Result<Vec<Document>> {
        let conn = self.conn.lock().await;
        super::queries::search_documents(&conn, q, skip, limit)
    }

    async fn documents_by_topic(
        &self,
        topic_id: i64,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Document>> {
        let conn = self.conn.lock().await;
        super::queries::documents_by_topic(&conn, topic_id, skip, limit)
    }

    async fn count_documents_by_topic(&self, topic_id: i64) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::count_documents_by_topic(&conn, topic_id)
    }

    async fn insert_topics(&self, topics: &[Topic]) -> Result<usize> {
        let conn = self.conn.lock().await;
        super::queries::insert_topics(&conn, topics)
    }

    async fn all_topics(&self) -> Result<Vec<Topic>> {
        let conn = self.conn.lock().await;
        super::queries::all_topics(&conn)
    }

    async fn list_topics(&self, skip: u32, limit: u32) -> Result<Vec<Topic>> {
        let conn = self.conn.lock().await;
        super::queries::list_topics(&conn, skip, limit)
    }

    async fn get_topic(&self, topic_id: i64) -> Result<Option<Topic>> {
        let conn = self.conn.lock().await;
        super::queries::get_topic(&conn, topic_id)
    }

    async fn count_topics(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::count_topics(&conn)
    }

    async fn delete_all_topics(&self) -> Result<usize> {
        let conn = self.conn.lock().await;
        super::queries::delete_all_topics(&conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::create_tables;

    async fn test_store() -> SqliteStore {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        SqliteStore::new(conn)
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

    #[tokio::test]
    async fn test_trait_document_roundtrip() {
        let store = test_store().await;
        let id = store
            .insert_document(&story("The Harbor", "Boats waited in the fog"))
            .await
            .unwrap();
        let doc = store.get_document(id).await.unwrap().unwrap();
        assert_eq!(doc.title, "The Harbor");
        assert_eq!(store.count_documents().await.unwrap(), 1);

        assert!(store.delete_document(id).await.unwrap());
        assert!(!store.delete_document(id).await.unwrap());
        assert_eq!(store.count_documents().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_trait_batch_insert_and_clear() {
        let store = test_store().await;
        let docs = vec![story("A", "one"), story("B", "two"), story("C", "three")];
        assert_eq!(store.insert_documents(&docs).await.unwrap(), 3);
        assert_eq!(store.all_documents().await.unwrap().len(), 3);
        assert_eq!(store.delete_all_documents().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_trait_topic_assignment() {
        let store = test_store().await;
        let id = store.insert_document(&story("Tale", "text")).await.unwrap();
        store
            .set_document_topics(id, &[0, 2], &["forest".to_string(), "ocean".to_string()])
            .await
            .unwrap();
        let doc = store.get_document(id).await.unwrap().unwrap();
        assert_eq!(doc.topics, vec![0, 2]);
        assert_eq!(doc.topic_names, vec!["forest", "ocean"]);

        let by_topic = store.documents_by_topic(2, 0, 10).await.unwrap();
        assert_eq!(by_topic.len(), 1);
    }

    #[tokio::test]
    async fn test_trait_table_count() {
        let store = test_store().await;
        assert_eq!(store.table_count().await.unwrap(), 3);
    }
}
