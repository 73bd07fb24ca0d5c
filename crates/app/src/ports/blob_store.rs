//! Blob store port — storage for uploaded image files.

use std::future::Future;

use autohub_domain::error::AutoHubError;

/// Stores opaque blobs under caller-chosen names.
///
/// Names are always generated by the application layer; implementations
/// should still refuse anything that could escape their storage root.
pub trait BlobStore {
    /// Write `content` under `name`.
    fn write(
        &self,
        name: &str,
        content: &[u8],
    ) -> impl Future<Output = Result<(), AutoHubError>> + Send;

    /// Remove the blob called `name`.
    ///
    /// Returns `false` when there was nothing to remove.
    fn delete(&self, name: &str) -> impl Future<Output = Result<bool, AutoHubError>> + Send;
}
