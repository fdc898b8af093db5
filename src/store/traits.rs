// Store trait — backend-agnostic async interface for all persistence.
//
// Implementor: SqliteStore (wraps rusqlite). All methods are async so a
// sync backend (rusqlite via Mutex) and any future native-async backend
// fit behind a single interface.
//
// The trait mirrors the queries.rs function signatures, so callers hold an
// `Arc<dyn Store>` and never see SQL or a Connection.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{Document, DocumentUpdate, NewDocument, Topic};

#[async_trait]
pub trait Store: Send + Sync {
    // --- Lifecycle ---

    /// Count the user-created tables in the store.
    async fn table_count(&self) -> Result<i64>;

    // --- Documents ---

    /// Insert one document, returning its store-assigned id.
    async fn insert_document(&self, doc: &NewDocument) -> Result<i64>;

    /// Insert a batch of documents.
    async fn insert_documents(&self, docs: &[NewDocument]) -> Result<usize>;

    /// List documents with sorting (whitelisted field) and pagination.
    async fn list_documents(
        &self,
        sort_by: &str,
        descending: bool,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Document>>;

    /// Load every document (the bootstrap corpus scan).
    async fn all_documents(&self) -> Result<Vec<Document>>;

    /// Fetch one document by id.
    async fn get_document(&self, id: i64) -> Result<Option<Document>>;

    /// Partial update ($set semantics). Returns false when the id matched
    /// no document.
    async fn update_document(&self, id: i64, update: &DocumentUpdate) -> Result<bool>;

    /// Overwrite a document's topic assignment.
    async fn set_document_topics(
        &self,
        id: i64,
        topics: &[i64],
        topic_names: &[String],
    ) -> Result<()>;

    /// Delete one document. Returns false when the id didn't exist.
    async fn delete_document(&self, id: i64) -> Result<bool>;

    /// Clear the document collection. Returns how many were removed.
    async fn delete_all_documents(&self) -> Result<usize>;

    async fn count_documents(&self) -> Result<i64>;

    /// Full-text search over title + content with a substring fallback.
    async fn search_documents(&self, q: &str, skip: u32, limit: u32) -> Result<Vec<Document>>;

    /// Documents whose topic list contains the given topic id.
    async fn documents_by_topic(
        &self,
        topic_id: i64,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Document>>;

    async fn count_documents_by_topic(&self, topic_id: i64) -> Result<i64>;

    // --- Topics ---

    /// Insert a batch of topics, preserving input order.
    async fn insert_topics(&self, topics: &[Topic]) -> Result<usize>;

    /// Load the entire taxonomy in stored order.
    async fn all_topics(&self) -> Result<Vec<Topic>>;

    /// List topics in stored order with pagination.
    async fn list_topics(&self, skip: u32, limit: u32) -> Result<Vec<Topic>>;

    /// Fetch one topic by its dense topic id.
    async fn get_topic(&self, topic_id: i64) -> Result<Option<Topic>>;

    async fn count_topics(&self) -> Result<i64>;

    /// Clear the topic collection. Returns how many were removed.
    async fn delete_all_topics(&self) -> Result<usize>;
}
