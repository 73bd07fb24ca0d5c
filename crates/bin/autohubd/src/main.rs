//! # autohubd — autohub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars) and install logging
//! - Initialize the `SQLite` connection pool and run migrations
//! - Open the image blob store and, when enabled, the MQTT publisher
//! - Construct the automation service, injecting adapters via port traits
//! - Build the axum router and serve until SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer. No domain logic belongs here.

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use autohub_adapter_blob_fs::FsBlobStore;
use autohub_adapter_http_axum::router;
use autohub_adapter_http_axum::state::AppState;
use autohub_adapter_mqtt::MqttEventPublisher;
use autohub_adapter_storage_sqlite_sqlx::SqliteAutomationRepository;
use autohub_app::event_bus::{FanOutPublisher, InProcessEventBus};
use autohub_app::services::automation_service::AutomationService;

use crate::config::Config;

const EVENT_BUS_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = autohub_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let automation_repo = SqliteAutomationRepository::new(db.pool().clone());

    // Blobs
    let blobs = FsBlobStore::open(&config.images.save_dir).await?;
    let image_dir = blobs.root().to_path_buf();

    // Notifications
    let event_bus = Arc::new(InProcessEventBus::new(EVENT_BUS_CAPACITY));
    let mqtt = config
        .mqtt
        .enabled
        .then(|| MqttEventPublisher::connect(&config.mqtt));
    let publisher = FanOutPublisher::new(Arc::clone(&event_bus), mqtt);

    // Services
    let automation_service =
        AutomationService::new(automation_repo, publisher, blobs, config.image_config());

    // HTTP
    let state = AppState::new(automation_service, event_bus);
    let app = router::build(state, &image_dir, config.body_limit());

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, image_dir = %image_dir.display(), "autohubd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("autohubd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
