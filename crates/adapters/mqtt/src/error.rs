//! MQTT adapter error types.

use autohub_domain::error::AutoHubError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The rumqttc client returned an error.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),

    /// The broker session is down, so the event cannot be delivered.
    #[error("MQTT broker not connected")]
    NotConnected,

    /// Failed to encode an event as JSON.
    #[error("failed to encode MQTT payload")]
    PayloadEncode(#[source] serde_json::Error),
}

impl From<MqttError> for AutoHubError {
    fn from(err: MqttError) -> Self {
        Self::Notification(Box::new(err))
    }
}
