//! # autohub-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `AutomationRepository` — CRUD plus a transactional handle for reordering
//!   - `BlobStore` — write & delete image blobs by name
//!   - `EventPublisher` — deliver change events to subscribers
//! - Define **driving/inbound ports** as use-case structs:
//!   - `AutomationService` — create, update, delete, list, swap order
//!   - `ImagePipeline`, `UrlPathResolver`, `OrderingEngine` — the pieces it composes
//! - Provide **in-process infrastructure** (event bus, fan-out) that doesn't need IO
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `autohub-domain` only (plus `tokio::sync` for channels and
//! `image` for content sniffing). Never imports adapter crates. Adapters
//! depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod ports;
pub mod services;

#[cfg(test)]
mod testing;
