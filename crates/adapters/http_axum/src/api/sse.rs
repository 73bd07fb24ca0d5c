//! Server-Sent Events (SSE) stream of automation changes.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use autohub_app::ports::{AutomationRepository, BlobStore, EventPublisher};

use crate::state::AppState;

/// `GET /api/events/stream` — SSE stream of automation change events.
///
/// Each event is sent as a JSON `data:` frame with the event type as the SSE
/// event name. The stream ends when the client disconnects.
pub async fn stream<R, P, B>(
    State(state): State<AppState<R, P, B>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>
where
    R: AutomationRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    let event_rx = state.event_bus.subscribe();
    let event_stream = BroadcastStream::new(event_rx).filter_map(|result| match result {
        Ok(event) => match serde_json::to_string(&event) {
            Ok(json) => Some(Ok(Event::default()
                .event(event.event_type.as_str())
                .data(json))),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize event to JSON for SSE stream");
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(n)) => {
            tracing::warn!(skipped = n, "SSE subscriber lagged, some events were dropped");
            None
        }
    });

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}
