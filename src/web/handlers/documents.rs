// Document handlers.
//
// POST   /api/documents                    — create with write-time tagging
// GET    /api/documents                    — paginated list, sortable
// GET    /api/documents/search             — full-text search
// GET    /api/documents/{doc_id}           — single document
// PUT    /api/documents/{doc_id}           — partial update
// DELETE /api/documents/{doc_id}           — delete
// GET    /api/documents/filter/topic/{id}  — documents carrying a topic id
//
// Document ids arrive as path strings and are parsed by hand so a
// malformed id maps to 400 rather than a router rejection.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::store::models::{DocumentUpdate, NewDocument};
use crate::tagging::extract::extract_keywords;
use crate::tagging::matcher::matching_topics;
use crate::web::{api_error, AppState};

/// Keywords extracted from a new document's text.
const DOC_KEYWORDS: usize = 10;
/// At most this many topic ids are assigned at creation.
const MAX_TOPICS: usize = 3;
/// The document's own keywords shown as display names.
const DISPLAY_NAMES: usize = 5;

#[derive(Deserialize)]
pub struct CreateDocumentRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub doi: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct DocumentsQuery {
    pub skip: Option<u32>,
    /// Results per page (default 50, max 200)
    pub limit: Option<u32>,
    /// Sort field (whitelisted; default date_added)
    pub sort_by: Option<String>,
    /// "asc" or "desc" (default desc)
    pub order: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Deserialize, Default)]
pub struct PageQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

/// POST /api/documents — store a document, tagging it synchronously.
///
/// Tagging never fails visibly: zero extracted keywords just means empty
/// topic lists.
pub async fn create_document(
    State(state): State<AppState>,
    Json(req): Json<CreateDocumentRequest>,
) -> Response {
    let text = crate::tagging::document_text(&req.title, &req.content);
    let keywords = extract_keywords(&text, DOC_KEYWORDS);

    let topics = match state.store.all_topics().await {
        Ok(topics) => topics,
        Err(e) => {
            tracing::error!(error = %e, "Store error while creating document");
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, "Store error while creating document");
        }
    };
    let matched = matching_topics(&keywords, &topics, MAX_TOPICS);
    let topic_names: Vec<String> = keywords.iter().take(DISPLAY_NAMES).cloned().collect();

    let doc = NewDocument {
        story_id: 0, // user-created, no provider id
        title: req.title,
        content: req.content,
        genre: req.genre.unwrap_or_else(|| "General".to_string()),
        topics: matched,
        topic_names,
        authors: req.authors,
        year: req.year,
        doi: req.doi,
        date_added: Utc::now().to_rfc3339(),
        popularity: 0,
    };

    let id = match state.store.insert_document(&doc).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(error = %e, "Store error while creating document");
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, "Store error while creating document");
        }
    };

    match state.store.get_document(id).await {
        Ok(Some(stored)) => Json(stored).into_response(),
        Ok(None) => api_error(StatusCode::INTERNAL_SERVER_ERROR, "Document vanished after insert"),
        Err(e) => {
            tracing::error!(error = %e, "Store error while creating document");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Store error while creating document")
        }
    }
}

/// GET /api/documents — paginated list, newest first by default.
pub async fn list_documents(
    State(state): State<AppState>,
    Query(params): Query<DocumentsQuery>,
) -> Response {
    let skip = params.skip.unwrap_or(0);
    let limit = params.limit.unwrap_or(50).min(200);
    let sort_by = params.sort_by.as_deref().unwrap_or("date_added");
    let descending = params.order.as_deref() != Some("asc");

    let documents = match state.store.list_documents(sort_by, descending, skip, limit).await {
        Ok(docs) => docs,
        Err(e) => {
            tracing::error!(error = %e, "Store error while listing documents");
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, "Store error while listing documents");
        }
    };
    let total = state.store.count_documents().await.unwrap_or(0);

    Json(serde_json::json!({
        "documents": documents,
        "total": total,
        "skip": skip,
        "limit": limit,
    }))
    .into_response()
}

/// GET /api/documents/search — FTS with substring fallback.
pub async fn search_documents(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Response {
    if params.q.is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "Search query must not be empty");
    }
    let skip = params.skip.unwrap_or(0);
    let limit = params.limit.unwrap_or(50).min(200);

    match state.store.search_documents(&params.q, skip, limit).await {
        Ok(documents) => Json(serde_json::json!({
            "count": documents.len(),
            "documents": documents,
            "query": params.q,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, query = %params.q, "Store error while searching documents");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Store error while searching documents")
        }
    }
}

/// GET /api/documents/{doc_id} — single document by id.
pub async fn get_document(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let Some(id) = parse_doc_id(&raw_id) else {
        return api_error(StatusCode::BAD_REQUEST, "Invalid document ID");
    };
    match state.store.get_document(id).await {
        Ok(Some(doc)) => Json(doc).into_response(),
        Ok(None) => api_error(StatusCode::NOT_FOUND, "Document not found"),
        Err(e) => {
            tracing::error!(error = %e, id, "Store error while fetching document");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Store error while fetching document")
        }
    }
}

/// PUT /api/documents/{doc_id} — partial update ($set semantics).
///
/// When `topics` is supplied, `topic_names` is regenerated from the
/// referenced topics' first-3 keywords. Ids that no longer resolve are
/// skipped — topic references are soft.
pub async fn update_document(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(mut update): Json<DocumentUpdate>,
) -> Response {
    let Some(id) = parse_doc_id(&raw_id) else {
        return api_error(StatusCode::BAD_REQUEST, "Invalid document ID");
    };
    if update.is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "No fields to update");
    }

    if let Some(ref topic_ids) = update.topics {
        let mut names = Vec::new();
        for topic_id in topic_ids {
            match state.store.get_topic(*topic_id).await {
                Ok(Some(topic)) => names.extend(topic.keywords.into_iter().take(3)),
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(error = %e, topic_id, "Store error while updating document");
                    return api_error(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Store error while updating document",
                    );
                }
            }
        }
        update.topic_names = Some(names);
    }

    match state.store.update_document(id, &update).await {
        Ok(true) => match state.store.get_document(id).await {
            Ok(Some(doc)) => Json(doc).into_response(),
            Ok(None) => api_error(StatusCode::NOT_FOUND, "Document not found"),
            Err(e) => {
                tracing::error!(error = %e, id, "Store error while updating document");
                api_error(StatusCode::INTERNAL_SERVER_ERROR, "Store error while updating document")
            }
        },
        Ok(false) => api_error(StatusCode::NOT_FOUND, "Document not found"),
        Err(e) => {
            tracing::error!(error = %e, id, "Store error while updating document");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Store error while updating document")
        }
    }
}

/// DELETE /api/documents/{doc_id}
pub async fn delete_document(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let Some(id) = parse_doc_id(&raw_id) else {
        return api_error(StatusCode::BAD_REQUEST, "Invalid document ID");
    };
    match state.store.delete_document(id).await {
        Ok(true) => Json(serde_json::json!({
            "message": "Document deleted successfully",
            "id": id,
        }))
        .into_response(),
        Ok(false) => api_error(StatusCode::NOT_FOUND, "Document not found"),
        Err(e) => {
            tracing::error!(error = %e, id, "Store error while deleting document");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Store error while deleting document")
        }
    }
}

/// GET /api/documents/filter/topic/{topic_id} — documents carrying a topic.
pub async fn documents_by_topic(
    State(state): State<AppState>,
    Path(topic_id): Path<i64>,
    Query(params): Query<PageQuery>,
) -> Response {
    let skip = params.skip.unwrap_or(0);
    let limit = params.limit.unwrap_or(50).min(200);

    let documents = match state.store.documents_by_topic(topic_id, skip, limit).await {
        Ok(docs) => docs,
        Err(e) => {
            tracing::error!(error = %e, topic_id, "Store error while filtering documents");
            return api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Store error while filtering documents",
            );
        }
    };
    let total = state
        .store
        .count_documents_by_topic(topic_id)
        .await
        .unwrap_or(0);

    Json(serde_json::json!({
        "documents": documents,
        "topic_id": topic_id,
        "total": total,
        "skip": skip,
        "limit": limit,
    }))
    .into_response()
}

/// Parse a document id from a path segment. Ids are positive integers;
/// anything else is a malformed reference.
fn parse_doc_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}
