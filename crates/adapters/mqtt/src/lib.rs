//! # autohub-adapter-mqtt
//!
//! MQTT adapter — publishes automation change events to a broker.
//!
//! ## Responsibilities
//! - Connect to an MQTT broker and keep the connection alive
//! - Implement the `EventPublisher` port by sending each event as JSON on
//!   `{base_topic}/automations/{created|updated|deleted}`
//!
//! ## Dependency rule
//! Same as other adapters: depends on `autohub-app` and `autohub-domain`.

mod config;
mod error;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rumqttc::{
    AsyncClient, ConnectReturnCode, ConnectionError, Event as MqttEvent, EventLoop, MqttOptions,
    Packet, QoS,
};

use autohub_app::ports::EventPublisher;
use autohub_domain::error::AutoHubError;
use autohub_domain::event::{Event, EventType};

pub use config::MqttConfig;
pub use error::MqttError;

const REQUEST_CAPACITY: usize = 64;
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Publishes automation events to an MQTT broker.
///
/// An event counts as sent only when the broker session is up and the
/// client queue accepted it; anything else is a notification error.
#[derive(Clone)]
pub struct MqttEventPublisher {
    client: AsyncClient,
    base_topic: String,
    connected: Arc<AtomicBool>,
}

impl MqttEventPublisher {
    /// Create the client and spawn the task driving its network event loop.
    ///
    /// Must be called from within a tokio runtime. The connection itself is
    /// established lazily by the event loop and re-attempted on failure;
    /// until the broker acknowledges it, [`EventPublisher::publish`] fails
    /// with [`MqttError::NotConnected`].
    #[must_use]
    pub fn connect(config: &MqttConfig) -> Self {
        let mut options = MqttOptions::new(
            config.client_id.clone(),
            config.broker_host.clone(),
            config.broker_port,
        );
        options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive_secs)));

        let (client, eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);
        let connected = Arc::new(AtomicBool::new(false));
        tokio::spawn(drive(eventloop, Arc::clone(&connected)));

        tracing::info!(
            host = %config.broker_host,
            port = config.broker_port,
            base_topic = %config.base_topic,
            "mqtt publisher started"
        );

        Self {
            client,
            base_topic: config.base_topic.clone(),
            connected,
        }
    }

    /// Whether the broker has acknowledged the current session.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    fn topic_for(&self, event_type: EventType) -> String {
        topic_for(&self.base_topic, event_type)
    }

    fn send(&self, event: &Event) -> Result<(), MqttError> {
        if !self.is_connected() {
            return Err(MqttError::NotConnected);
        }
        let payload = serde_json::to_vec(event).map_err(MqttError::PayloadEncode)?;
        // Never wait on a full request queue.
        self.client
            .try_publish(self.topic_for(event.event_type), QoS::AtLeastOnce, false, payload)
            .map_err(MqttError::Client)
    }
}

impl EventPublisher for MqttEventPublisher {
    async fn publish(&self, event: Event) -> Result<(), AutoHubError> {
        if let Err(err) = self.send(&event) {
            tracing::warn!(event_id = %event.id, error = %err, "event not sent to broker");
            return Err(err.into());
        }
        tracing::debug!(event_id = %event.id, event_type = event.event_type.as_str(), "event sent to broker");
        Ok(())
    }
}

fn topic_for(base_topic: &str, event_type: EventType) -> String {
    format!(
        "{}/automations/{}",
        base_topic.trim_end_matches('/'),
        event_type.as_str()
    )
}

/// Record the session state implied by one event loop poll.
fn track(connected: &AtomicBool, polled: &Result<MqttEvent, ConnectionError>) {
    match polled {
        Ok(MqttEvent::Incoming(Packet::ConnAck(ack))) => {
            let up = ack.code == ConnectReturnCode::Success;
            connected.store(up, Ordering::Release);
            if up {
                tracing::info!("mqtt broker connected");
            }
        }
        Ok(_) => {}
        Err(_) => connected.store(false, Ordering::Release),
    }
}

async fn drive(mut eventloop: EventLoop, connected: Arc<AtomicBool>) {
    loop {
        let polled = eventloop.poll().await;
        track(&connected, &polled);
        if let Err(err) = polled {
            tracing::warn!(error = %err, "mqtt connection error, retrying");
            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    }
}
