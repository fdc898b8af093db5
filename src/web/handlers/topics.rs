// Topic handlers.
//
// GET  /api/topics            — paginated taxonomy listing
// GET  /api/topics/{topic_id} — single topic by dense id
// POST /api/topics/generate   — full regeneration via the external model
// POST /api/topics/suggest    — keyword extraction + topic suggestions

use std::path::Path as FsPath;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::clustering;
use crate::ingest;
use crate::tagging::extract::extract_keywords;
use crate::tagging::matcher::matching_topics;
use crate::web::{api_error, AppState};

/// At most this many topic ids are suggested.
const MAX_SUGGESTIONS: usize = 5;

#[derive(Deserialize, Default)]
pub struct TopicsQuery {
    pub skip: Option<u32>,
    /// Results per page (default 100, max 500)
    pub limit: Option<u32>,
}

#[derive(Deserialize)]
pub struct SuggestRequest {
    pub content: String,
    #[serde(default = "default_num_topics")]
    pub num_topics: usize,
}

fn default_num_topics() -> usize {
    5
}

/// GET /api/topics — the taxonomy in stored order.
pub async fn list_topics(State(state): State<AppState>, Query(params): Query<TopicsQuery>) -> Response {
    let skip = params.skip.unwrap_or(0);
    let limit = params.limit.unwrap_or(100).min(500);

    match state.store.list_topics(skip, limit).await {
        Ok(topics) => Json(topics).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Store error while listing topics");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Store error while listing topics")
        }
    }
}

/// GET /api/topics/{topic_id} — single topic by its dense id.
pub async fn get_topic(State(state): State<AppState>, Path(topic_id): Path<i64>) -> Response {
    match state.store.get_topic(topic_id).await {
        Ok(Some(topic)) => Json(topic).into_response(),
        Ok(None) => api_error(StatusCode::NOT_FOUND, "Topic not found"),
        Err(e) => {
            tracing::error!(error = %e, topic_id, "Store error while fetching topic");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Store error while fetching topic")
        }
    }
}

/// POST /api/topics/generate — rebuild topics and documents from the CSV
/// corpus via the external topic model.
///
/// The model is a capability: when none is wired in, this reports 503 and
/// the store is not touched. The heuristic is never a fallback here.
pub async fn generate_topics(State(state): State<AppState>) -> Response {
    let Some(model) = state.topic_model.clone() else {
        return api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Topic model is not available; full-corpus regeneration is disabled",
        );
    };

    let csv_path = FsPath::new(&state.config.csv_path);
    if !csv_path.exists() {
        return api_error(
            StatusCode::NOT_FOUND,
            &format!("CSV file not found: {}", state.config.csv_path),
        );
    }

    let rows = match ingest::read_stories(csv_path) {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read CSV corpus");
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read CSV corpus");
        }
    };

    match clustering::regenerate(&state.store, model.as_ref(), &rows).await {
        Ok(summary) => Json(serde_json::json!({
            "message": "Topics generated successfully",
            "topics_count": summary.topics_count,
            "documents_processed": summary.documents_processed,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Error generating topics");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Error generating topics")
        }
    }
}

/// POST /api/topics/suggest — extract keywords from free text and suggest
/// matching topic ids from the stored taxonomy.
pub async fn suggest_topics(
    State(state): State<AppState>,
    Json(req): Json<SuggestRequest>,
) -> Response {
    let keywords = extract_keywords(&req.content, req.num_topics);

    let topics = match state.store.all_topics().await {
        Ok(topics) => topics,
        Err(e) => {
            tracing::error!(error = %e, "Store error while suggesting topics");
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, "Store error while suggesting topics");
        }
    };
    let suggested = matching_topics(&keywords, &topics, MAX_SUGGESTIONS);

    Json(serde_json::json!({
        "keywords": keywords,
        "suggested_topic_ids": suggested,
    }))
    .into_response()
}
