//! In-process event bus backed by a tokio broadcast channel.

use std::future::Future;

use tokio::sync::broadcast;

use autohub_domain::error::AutoHubError;
use autohub_domain::event::Event;

use crate::ports::EventPublisher;

/// In-process event bus using a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the event is simply dropped).
pub struct InProcessEventBus {
    sender: broadcast::Sender<Event>,
}

impl InProcessEventBus {
    /// Create a new event bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events on this bus.
    ///
    /// Returns a receiver that will get all events published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), AutoHubError>> + Send {
        // send only fails with zero receivers
        let _ = self.sender.send(event);
        async { Ok(()) }
    }
}

/// Delivers every event to two publishers.
///
/// Both are always attempted; the first failure is returned.
pub struct FanOutPublisher<A, B> {
    first: A,
    second: B,
}

impl<A, B> FanOutPublisher<A, B> {
    #[must_use]
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A, B> EventPublisher for FanOutPublisher<A, B>
where
    A: EventPublisher + Send + Sync,
    B: EventPublisher + Send + Sync,
{
    async fn publish(&self, event: Event) -> Result<(), AutoHubError> {
        let first = self.first.publish(event.clone()).await;
        let second = self.second.publish(event).await;
        first.and(second)
    }
}
