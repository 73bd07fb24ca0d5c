//! Automation — a named, ordered record with an optional image.

use serde::{Deserialize, Serialize};

use crate::error::{AutoHubError, ValidationError};
use crate::id::AutomationId;
use crate::image::ImageUpload;

/// A persisted automation.
///
/// `url_path` and `position` are unique across all live automations; the
/// application layer assigns both, callers never choose them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Automation {
    pub id: AutomationId,
    pub name: String,
    pub url_path: String,
    pub position: i64,
    /// Name of the associated blob, if any.
    pub image: Option<String>,
}

impl Automation {
    /// Create a builder for constructing an [`Automation`].
    #[must_use]
    pub fn builder() -> AutomationBuilder {
        AutomationBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AutoHubError::Validation`] when `name` is blank, `url_path`
    /// is empty, or `position` is not positive.
    pub fn validate(&self) -> Result<(), AutoHubError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.url_path.is_empty() {
            return Err(ValidationError::EmptyUrlPath.into());
        }
        if self.position < 1 {
            return Err(ValidationError::InvalidPosition(self.position).into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Automation`].
#[derive(Debug, Default)]
pub struct AutomationBuilder {
    id: Option<AutomationId>,
    name: Option<String>,
    url_path: Option<String>,
    position: Option<i64>,
    image: Option<String>,
}

impl AutomationBuilder {
    #[must_use]
    pub fn id(mut self, id: AutomationId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn url_path(mut self, url_path: impl Into<String>) -> Self {
        self.url_path = Some(url_path.into());
        self
    }

    #[must_use]
    pub fn position(mut self, position: i64) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Consume the builder, validate, and return an [`Automation`].
    ///
    /// # Errors
    ///
    /// Returns [`AutoHubError::Validation`] if any invariant fails.
    pub fn build(self) -> Result<Automation, AutoHubError> {
        let automation = Automation {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            url_path: self.url_path.unwrap_or_default(),
            position: self.position.unwrap_or(1),
            image: self.image.filter(|name| !name.is_empty()),
        };
        automation.validate()?;
        Ok(automation)
    }
}

/// Caller input for a create or update.
///
/// Carries the transient upload fields that exist only for the duration of
/// the call. `id` is ignored on create; `position` is always ignored.
#[derive(Debug, Clone, Default)]
pub struct AutomationInput {
    pub id: Option<AutomationId>,
    pub name: String,
    pub position: Option<i64>,
    pub image_upload: Option<ImageUpload>,
    pub remove_image: bool,
}

impl AutomationInput {
    /// Input carrying only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Target an existing automation (update).
    #[must_use]
    pub fn with_id(mut self, id: AutomationId) -> Self {
        self.id = Some(id);
        self
    }

    /// Attach an image upload.
    #[must_use]
    pub fn with_image(mut self, upload: ImageUpload) -> Self {
        self.image_upload = Some(upload);
        self
    }

    /// Ask for the current image to be dropped.
    #[must_use]
    pub fn removing_image(mut self) -> Self {
        self.remove_image = true;
        self
    }
}
