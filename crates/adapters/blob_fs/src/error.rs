//! Blob store error type.

use autohub_domain::error::AutoHubError;

/// Errors originating from the filesystem blob store.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// The blob name is not a plain file name.
    #[error("invalid blob name {0:?}")]
    InvalidName(String),

    /// A filesystem operation failed.
    #[error("blob io error")]
    Io(#[from] std::io::Error),
}

impl From<BlobError> for AutoHubError {
    fn from(err: BlobError) -> Self {
        Self::Blob(Box::new(err))
    }
}
