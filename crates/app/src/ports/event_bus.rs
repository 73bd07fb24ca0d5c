//! Event bus port — delivery of automation change notifications.

use std::future::Future;

use autohub_domain::error::AutoHubError;
use autohub_domain::event::Event;

/// Publishes change events to interested subscribers.
pub trait EventPublisher {
    /// Deliver an event, reporting whether delivery succeeded.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), AutoHubError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), AutoHubError>> + Send {
        (**self).publish(event)
    }
}

/// An absent publisher accepts every event.
impl<T: EventPublisher + Send + Sync> EventPublisher for Option<T> {
    async fn publish(&self, event: Event) -> Result<(), AutoHubError> {
        match self {
            Some(inner) => inner.publish(event).await,
            None => Ok(()),
        }
    }
}
