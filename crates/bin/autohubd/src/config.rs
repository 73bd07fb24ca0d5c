//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `autohub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;

use autohub_adapter_mqtt::MqttConfig;
use autohub_app::services::image_pipeline::ImageConfig;
use serde::Deserialize;

/// Slack on top of the image size limit for the rest of a multipart body.
const BODY_OVERHEAD: usize = 64 * 1024;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Image upload settings.
    pub images: ImagesConfig,
    /// MQTT event publishing.
    pub mqtt: MqttConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Image upload configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Directory blobs are written to and served from.
    pub save_dir: PathBuf,
    /// Largest accepted upload, in bytes.
    pub max_size: u64,
    /// Accepted file extensions.
    pub extensions: Vec<String>,
}

impl Config {
    /// Load configuration from `autohub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("autohub.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("AUTOHUB_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("AUTOHUB_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("AUTOHUB_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("AUTOHUB_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("AUTOHUB_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("AUTOHUB_IMAGE_DIR") {
            self.images.save_dir = PathBuf::from(val);
        }
        if let Some(size) = var("AUTOHUB_IMAGE_MAX_SIZE").and_then(|val| val.parse().ok()) {
            self.images.max_size = size;
        }
        if let Some(val) = var("AUTOHUB_MQTT_HOST") {
            self.mqtt.broker_host = val;
            self.mqtt.enabled = true;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.images.max_size == 0 {
            return Err(ConfigError::Validation(
                "images.max_size must be non-zero".to_string(),
            ));
        }
        if self.images.extensions.iter().all(|ext| ext.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "images.extensions must list at least one extension".to_string(),
            ));
        }
        if self.mqtt.enabled && self.mqtt.broker_port == 0 {
            return Err(ConfigError::Validation(
                "mqtt.broker_port must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// Upload limits handed to the image pipeline.
    #[must_use]
    pub fn image_config(&self) -> ImageConfig {
        ImageConfig {
            max_size: self.images.max_size,
            extensions: self.images.extensions.clone(),
        }
    }

    /// Largest request body accepted by the HTTP layer.
    #[must_use]
    pub fn body_limit(&self) -> usize {
        usize::try_from(self.images.max_size)
            .unwrap_or(usize::MAX)
            .saturating_add(BODY_OVERHEAD)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:autohub.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "autohubd=info,autohub=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for ImagesConfig {
    fn default() -> Self {
        let defaults = ImageConfig::default();
        Self {
            save_dir: PathBuf::from("images"),
            max_size: defaults.max_size,
            extensions: defaults.extensions,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.url, "sqlite:autohub.db?mode=rwc");
        assert_eq!(config.images.save_dir, PathBuf::from("images"));
        assert_eq!(config.images.max_size, 5 * 1024 * 1024);
        assert_eq!(config.images.extensions, vec!["png", "jpg", "jpeg", "gif"]);
        assert!(!config.mqtt.enabled);
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [database]
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [images]
            save_dir = '/var/lib/autohub/images'
            max_size = 1024
            extensions = ['png']

            [mqtt]
            enabled = true
            broker_host = 'broker.local'
            base_topic = 'home'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.images.save_dir, PathBuf::from("/var/lib/autohub/images"));
        assert_eq!(config.images.max_size, 1024);
        assert_eq!(config.images.extensions, vec!["png"]);
        assert!(config.mqtt.enabled);
        assert_eq!(config.mqtt.broker_host, "broker.local");
        assert_eq!(config.mqtt.base_topic, "home");
        assert_eq!(config.mqtt.broker_port, 1883);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_image_size() {
        let mut config = Config::default();
        config.images.max_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_empty_extension_list() {
        let mut config = Config::default();
        config.images.extensions = vec![];
        assert!(config.validate().is_err());

        config.images.extensions = vec![" ".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_default_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_format_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn should_return_database_url() {
        let config = Config::default();
        assert_eq!(config.database_url(), "sqlite:autohub.db?mode=rwc");
    }

    #[test]
    fn should_apply_env_overrides() {
        let mut config = Config::default();
        config.apply_overrides(env(&[
            ("AUTOHUB_PORT", "8080"),
            ("AUTOHUB_DATABASE_URL", "sqlite::memory:"),
            ("AUTOHUB_LOG", "warn"),
            ("AUTOHUB_IMAGE_DIR", "/tmp/img"),
            ("AUTOHUB_IMAGE_MAX_SIZE", "2048"),
        ]));

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database_url(), "sqlite::memory:");
        assert_eq!(config.logging.filter, "warn");
        assert_eq!(config.images.save_dir, PathBuf::from("/tmp/img"));
        assert_eq!(config.images.max_size, 2048);
    }

    #[test]
    fn should_prefer_bind_over_host_and_port() {
        let mut config = Config::default();
        config.apply_overrides(env(&[
            ("AUTOHUB_HOST", "10.0.0.1"),
            ("AUTOHUB_PORT", "1234"),
            ("AUTOHUB_BIND", "127.0.0.1:4000"),
        ]));
        assert_eq!(config.bind_addr(), "127.0.0.1:4000");
    }

    #[test]
    fn should_let_rust_log_win_over_autohub_log() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("AUTOHUB_LOG", "warn"), ("RUST_LOG", "trace")]));
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_ignore_unparsable_numbers() {
        let mut config = Config::default();
        config.apply_overrides(env(&[
            ("AUTOHUB_PORT", "http"),
            ("AUTOHUB_IMAGE_MAX_SIZE", "big"),
        ]));
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.images.max_size, 5 * 1024 * 1024);
    }

    #[test]
    fn should_enable_mqtt_when_host_is_given() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("AUTOHUB_MQTT_HOST", "broker.local")]));
        assert!(config.mqtt.enabled);
        assert_eq!(config.mqtt.broker_host, "broker.local");
    }

    #[test]
    fn should_translate_image_settings() {
        let mut config = Config::default();
        config.images.max_size = 10;
        config.images.extensions = vec!["gif".to_string()];

        let images = config.image_config();
        assert_eq!(images.max_size, 10);
        assert_eq!(images.extensions, vec!["gif"]);
        assert_eq!(config.body_limit(), 10 + BODY_OVERHEAD);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
