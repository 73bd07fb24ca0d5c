//! Axum router assembly.

use std::path::Path;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use autohub_app::ports::{AutomationRepository, BlobStore, EventPublisher};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api` and serves files from `image_dir` under
/// `/images`. Request bodies are capped at `body_limit` bytes. Includes a
/// [`TraceLayer`] that logs each HTTP request/response using the `tracing`
/// ecosystem.
pub fn build<R, P, B>(state: AppState<R, P, B>, image_dir: &Path, body_limit: usize) -> Router
where
    R: AutomationRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .nest_service("/images", ServeDir::new(image_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
