// CSV load handler.
//
// GET /api/csv/load — replace the document collection with the configured
// CSV corpus. Documents land untagged; the bootstrap or a regeneration
// assigns topics afterwards.

use std::path::Path as FsPath;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::ingest;
use crate::web::{api_error, AppState};

pub async fn load_csv(State(state): State<AppState>) -> Response {
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

    match ingest::load_corpus(&state.store, &rows).await {
        Ok(loaded) => Json(serde_json::json!({
            "message": "CSV data loaded successfully",
            "documents_loaded": loaded,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Store error while loading CSV");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Store error while loading CSV")
        }
    }
}
