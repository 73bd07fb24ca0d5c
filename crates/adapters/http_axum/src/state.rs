//! Shared application state for axum handlers.

use std::sync::Arc;

use autohub_app::event_bus::InProcessEventBus;
use autohub_app::ports::{AutomationRepository, BlobStore, EventPublisher};
use autohub_app::services::automation_service::AutomationService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository, publisher and blob store to avoid dynamic
/// dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<R, P, B> {
    /// Automation lifecycle service.
    pub automation_service: Arc<AutomationService<R, P, B>>,
    /// In-process event bus, subscribed to by SSE clients.
    pub event_bus: Arc<InProcessEventBus>,
}

impl<R, P, B> Clone for AppState<R, P, B> {
    fn clone(&self) -> Self {
        Self {
            automation_service: Arc::clone(&self.automation_service),
            event_bus: Arc::clone(&self.event_bus),
        }
    }
}

impl<R, P, B> AppState<R, P, B>
where
    R: AutomationRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    /// Create a new application state.
    ///
    /// `event_bus` must be the same bus the service publishes to, or SSE
    /// clients will never see an event.
    pub fn new(
        automation_service: AutomationService<R, P, B>,
        event_bus: Arc<InProcessEventBus>,
    ) -> Self {
        Self {
            automation_service: Arc::new(automation_service),
            event_bus,
        }
    }
}
