//! # autohub-domain
//!
//! Pure domain model for the autohub automation catalogue.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Automations** (named, ordered records with an optional image)
//! - Define **url paths** (slugs derived from automation names)
//! - Define **image uploads** (transient payloads carried by create/update)
//! - Define **Events** (change notifications for automations)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod automation;
pub mod event;
pub mod image;
pub mod url_path;
