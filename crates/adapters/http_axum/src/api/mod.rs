//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod automations;
pub mod sse;

use axum::Router;
use axum::routing::get;

use autohub_app::ports::{AutomationRepository, BlobStore, EventPublisher};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<R, P, B>() -> Router<AppState<R, P, B>>
where
    R: AutomationRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/automations",
            get(automations::list::<R, P, B>)
                .post(automations::create::<R, P, B>)
                .patch(automations::update::<R, P, B>),
        )
        .route(
            "/automations/{id}",
            get(automations::get::<R, P, B>).delete(automations::delete::<R, P, B>),
        )
        .route(
            "/automations/{id1}/swap/{id2}",
            get(automations::swap::<R, P, B>),
        )
        .route("/events/stream", get(sse::stream::<R, P, B>))
}
