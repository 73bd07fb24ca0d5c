//! Image uploads — transient payloads attached to a create or update call.

use std::fmt;
use std::path::Path;

/// An uploaded image as received from the transport layer.
///
/// Never persisted: the image pipeline turns it into a blob name.
#[derive(Clone)]
pub struct ImageUpload {
    /// Filename as supplied by the client. Only its extension is trusted.
    pub file_name: String,
    /// Size declared by the client, checked before any byte is read.
    pub size: u64,
    /// Raw payload.
    pub content: Vec<u8>,
}

impl ImageUpload {
    /// Build an upload whose declared size is the payload length.
    #[must_use]
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            size: content.len() as u64,
            content,
        }
    }

    /// Extension of the original filename, without the dot.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("size", &self.size)
            .field("content_len", &self.content.len())
            .finish()
    }
}
