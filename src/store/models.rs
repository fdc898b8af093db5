// Data models — Rust structs that map to store rows.
//
// These are the types that flow through the application. They're separate
// from the store queries so other modules can use them without depending
// on rusqlite directly.

use serde::{Deserialize, Serialize};

/// A stored short-story document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    /// Provider-assigned story id from the CSV corpus; 0 for user-created.
    pub story_id: i64,
    pub title: String,
    pub content: String,
    pub genre: String,
    /// Assigned topic ids, at most 3, in match order. Soft references —
    /// a regeneration may leave ids here that no longer resolve.
    pub topics: Vec<i64>,
    /// Display-name cache derived from `topics` (or from the document's
    /// own keywords); regenerated independently, not guaranteed 1:1.
    pub topic_names: Vec<String>,
    pub authors: Vec<String>,
    pub year: Option<i32>,
    pub doi: Option<String>,
    /// RFC 3339 UTC timestamp.
    pub date_added: String,
    pub popularity: i64,
}

/// A document about to be inserted — everything but the store-assigned id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDocument {
    pub story_id: i64,
    pub title: String,
    pub content: String,
    pub genre: String,
    pub topics: Vec<i64>,
    pub topic_names: Vec<String>,
    pub authors: Vec<String>,
    pub year: Option<i32>,
    pub doi: Option<String>,
    pub date_added: String,
    pub popularity: i64,
}

/// A partial document update — only Some fields are written ($set semantics).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub genre: Option<String>,
    pub topics: Option<Vec<i64>>,
    pub topic_names: Option<Vec<String>>,
    pub authors: Option<Vec<String>>,
    pub year: Option<i32>,
    pub doi: Option<String>,
}

impl DocumentUpdate {
    /// True when no field is set — the caller should reject the update.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.genre.is_none()
            && self.topics.is_none()
            && self.topic_names.is_none()
            && self.authors.is_none()
            && self.year.is_none()
            && self.doi.is_none()
    }
}

/// A topic in the taxonomy.
///
/// `topic_id` is dense (0.. during bootstrap) or assigned by the external
/// model. There is no uniqueness constraint — the collection is cleared
/// before every regeneration, so ids only need to be unique within one
/// generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub topic_id: i64,
    pub name: String,
    /// Ordered — the first entries are the most characteristic, and the
    /// first 3 double as display names.
    pub keywords: Vec<String>,
    pub count: i64,
    /// Reserved field; always empty in the current paths.
    pub representative_docs: Vec<String>,
}
