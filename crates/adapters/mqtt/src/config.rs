//! Settings for forwarding automation change events to a broker.
//!
//! Read from the `[mqtt]` section of `autohub.toml`; every field is optional.

use serde::Deserialize;

/// Where and how [`MqttEventPublisher`](crate::MqttEventPublisher) connects.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// Off by default; the in-process bus alone then carries events.
    pub enabled: bool,
    pub broker_host: String,
    pub broker_port: u16,
    /// Must be unique per broker, or instances will kick each other off.
    pub client_id: String,
    /// Events go to `{base_topic}/automations/{created|updated|deleted}`.
    pub base_topic: String,
    pub keep_alive_secs: u16,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "autohub".to_string(),
            base_topic: "autohub".to_string(),
            keep_alive_secs: 30,
        }
    }
}
