//! # autohub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `AutomationRepository` port defined in `autohub-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Enforce `url_path` and `position` uniqueness through `UNIQUE` constraints
//!
//! ## Dependency rule
//! Depends on `autohub-app` (for port traits) and `autohub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod automation_repo;
mod error;
mod pool;

pub use automation_repo::{SqliteAutomationRepository, SqliteAutomationTransaction};
pub use error::StorageError;
pub use pool::{Config, Database};
