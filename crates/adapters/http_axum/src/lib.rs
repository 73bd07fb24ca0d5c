//! # autohub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** for automations under `/api/automations`, taking
//!   multipart bodies on create and update so an image can ride along
//! - Serve stored images read-only under `/images`
//! - Stream change events as Server-Sent Events on `/api/events/stream`
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `autohub-app` (for port traits and services) and `autohub-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
