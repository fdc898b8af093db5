// Web server — Axum-based REST API over the store and the tagging pipeline.
//
// All routes serve JSON. Handlers are thin: they validate input, call the
// store or a core function, and map the outcome to a status code. The
// error taxonomy lives in that mapping — 404 for absent ids, 400 for
// malformed ones, 503 for the missing topic-model collaborator, 500 for
// store failures (logged with context, reported generically).

use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::clustering::TopicModel;
use crate::config::Config;
use crate::store::Store;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<Config>,
    /// The optional external topic model. None means the generate endpoint
    /// reports 503 and never touches the store.
    pub topic_model: Option<Arc<dyn TopicModel>>,
}

/// Start the web server and block until it exits.
pub async fn run_server(
    config: Config,
    store: Arc<dyn Store>,
    topic_model: Option<Arc<dyn TopicModel>>,
    port: u16,
    bind: &str,
) -> Result<()> {
    let state = AppState {
        store,
        config: Arc::new(config),
        topic_model,
    };

    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("Storykeep API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Assemble the full router. Public so integration tests can drive it
/// in-process with `tower::ServiceExt::oneshot`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api_root))
        .route("/health", get(health))
        .route(
            "/api/documents",
            get(handlers::documents::list_documents).post(handlers::documents::create_document),
        )
        .route(
            "/api/documents/search",
            get(handlers::documents::search_documents),
        )
        .route(
            "/api/documents/{doc_id}",
            get(handlers::documents::get_document)
                .put(handlers::documents::update_document)
                .delete(handlers::documents::delete_document),
        )
        .route(
            "/api/documents/filter/topic/{topic_id}",
            get(handlers::documents::documents_by_topic),
        )
        .route("/api/topics", get(handlers::topics::list_topics))
        .route(
            "/api/topics/generate",
            post(handlers::topics::generate_topics),
        )
        .route("/api/topics/suggest", post(handlers::topics::suggest_topics))
        .route("/api/topics/{topic_id}", get(handlers::topics::get_topic))
        .route("/api/csv/load", get(handlers::ingest::load_csv))
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PUT,
                    axum::http::Method::DELETE,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET / — service name, version, and the endpoint map.
async fn api_root() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "message": "Storykeep API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "topics": "/api/topics",
            "documents": "/api/documents",
            "search": "/api/documents/search",
            "generate_topics": "/api/topics/generate",
        }
    }))
}

/// Health check — always returns 200 OK.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
