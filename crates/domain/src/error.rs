//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`AutoHubError`] via `From`, so the application layer only ever
//! reasons about three classes: validation, not-found and infrastructure.

use std::error::Error as StdError;

/// Boxed infrastructure error carried across port boundaries.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Top-level error returned by every port and use-case.
#[derive(Debug, thiserror::Error)]
pub enum AutoHubError {
    /// Caller supplied bad input. Never retried.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The targeted record does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The persistence layer failed.
    #[error("storage error")]
    Storage(#[source] BoxError),

    /// Reading or writing a blob failed.
    #[error("blob storage error")]
    Blob(#[source] BoxError),

    /// A change notification could not be delivered.
    #[error("notification delivery failed")]
    Notification(#[source] BoxError),
}

/// Domain invariant violations and rejected uploads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("url path must not be empty")]
    EmptyUrlPath,

    #[error("position must be positive, got {0}")]
    InvalidPosition(i64),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("an identifier is required")]
    MissingId,

    #[error("image is too large ({size} bytes), max size is {max} bytes")]
    ImageTooLarge { size: u64, max: u64 },

    #[error("invalid image extension {extension:?}, allowed extensions are: {allowed}")]
    DisallowedExtension { extension: String, allowed: String },

    #[error("file is not an image")]
    NotAnImage,

    #[error("mismatch between file extension {extension:?} and content type {detected}")]
    ContentTypeMismatch { extension: String, detected: String },
}

/// A lookup targeted a record that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

impl AutoHubError {
    /// Wrap a persistence failure.
    pub fn storage(err: impl Into<BoxError>) -> Self {
        Self::Storage(err.into())
    }

    /// Wrap a blob I/O failure.
    pub fn blob(err: impl Into<BoxError>) -> Self {
        Self::Blob(err.into())
    }

    /// Wrap a notification delivery failure.
    pub fn notification(err: impl Into<BoxError>) -> Self {
        Self::Notification(err.into())
    }
}
