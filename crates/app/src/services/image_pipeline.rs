//! Image pipeline — validates uploads and stores them as blobs.

use image::ImageFormat;

use autohub_domain::error::{AutoHubError, ValidationError};
use autohub_domain::image::ImageUpload;

use crate::ports::BlobStore;

/// Number of leading bytes inspected to detect the content type.
const SNIFF_LEN: usize = 512;

/// Upload limits, injected at construction.
#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// Largest accepted declared size, in bytes.
    pub max_size: u64,
    /// Accepted filename extensions, compared case-insensitively.
    /// A leading dot is ignored.
    pub extensions: Vec<String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_size: 5 * 1024 * 1024,
            extensions: ["png", "jpg", "jpeg", "gif"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl ImageConfig {
    fn allows(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(extension))
    }

    fn allowed_list(&self) -> String {
        self.extensions.join(", ")
    }
}

/// Validates uploaded images and manages their blobs.
pub struct ImagePipeline<B> {
    blobs: B,
    config: ImageConfig,
}

impl<B: BlobStore> ImagePipeline<B> {
    /// Create a pipeline writing into `blobs`.
    pub fn new(blobs: B, config: ImageConfig) -> Self {
        Self { blobs, config }
    }

    /// Validate `upload` and store it under a freshly generated name.
    ///
    /// Checks run cheapest first: declared size, extension, then the sniffed
    /// content type, which must be an image matching the extension. A failed
    /// structural decode is logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AutoHubError::Validation`] when the upload is rejected and
    /// [`AutoHubError::Blob`] when writing the blob fails.
    #[tracing::instrument(skip(self, upload), fields(file_name = %upload.file_name, size = upload.size))]
    pub async fn store(&self, upload: ImageUpload) -> Result<String, AutoHubError> {
        if upload.size > self.config.max_size {
            return Err(ValidationError::ImageTooLarge {
                size: upload.size,
                max: self.config.max_size,
            }
            .into());
        }

        let extension = upload.extension().unwrap_or_default().to_string();
        if !self.config.allows(&extension) {
            return Err(ValidationError::DisallowedExtension {
                extension,
                allowed: self.config.allowed_list(),
            }
            .into());
        }

        let format = self.sniff(&upload.content, &extension)?;

        if let Err(err) = image::load_from_memory_with_format(&upload.content, format) {
            tracing::warn!(%err, image_format = ?format, "image failed to decode, accepting anyway");
        }

        let name = format!("{}.{extension}", uuid::Uuid::new_v4());
        self.blobs.write(&name, &upload.content).await?;
        tracing::debug!(blob = %name, "image stored");

        Ok(name)
    }

    /// Remove a previously stored image.
    ///
    /// An empty name and an already missing blob both count as success.
    ///
    /// # Errors
    ///
    /// Returns [`AutoHubError::Blob`] when the removal itself fails.
    pub async fn delete(&self, name: &str) -> Result<(), AutoHubError> {
        if name.is_empty() {
            return Ok(());
        }
        if self.blobs.delete(name).await? {
            tracing::debug!(blob = %name, "image deleted");
        } else {
            tracing::debug!(blob = %name, "image already gone");
        }
        Ok(())
    }

    fn sniff(&self, content: &[u8], extension: &str) -> Result<ImageFormat, AutoHubError> {
        let head = &content[..content.len().min(SNIFF_LEN)];
        let format = image::guess_format(head).map_err(|_| ValidationError::NotAnImage)?;

        let mismatch = || ValidationError::ContentTypeMismatch {
            extension: extension.to_string(),
            detected: format.to_mime_type().to_string(),
        };

        if !format.extensions_str().iter().any(|ext| self.config.allows(ext)) {
            return Err(mismatch().into());
        }
        if ImageFormat::from_extension(extension) != Some(format) {
            return Err(mismatch().into());
        }
        Ok(format)
    }
}
