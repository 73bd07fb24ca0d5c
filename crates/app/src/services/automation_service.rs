//! Automation service — use-cases for managing automations.
//!
//! Every mutation is persisted first and announced second. A failed
//! announcement is reported to the caller but never undoes the write: there
//! is no outbox, so subscribers stay behind until the next change.

use autohub_domain::automation::{Automation, AutomationInput};
use autohub_domain::error::{AutoHubError, NotFoundError, ValidationError};
use autohub_domain::event::{Event, EventType};
use autohub_domain::id::AutomationId;

use crate::ports::{AutomationRepository, BlobStore, EventPublisher};
use crate::services::image_pipeline::{ImageConfig, ImagePipeline};
use crate::services::ordering::OrderingEngine;
use crate::services::url_path_resolver::UrlPathResolver;

/// Application service for the automation lifecycle.
pub struct AutomationService<R, P, B> {
    repo: R,
    publisher: P,
    images: ImagePipeline<B>,
}

impl<R, P, B> AutomationService<R, P, B>
where
    R: AutomationRepository,
    P: EventPublisher,
    B: BlobStore,
{
    /// Create a new service from its collaborators.
    pub fn new(repo: R, publisher: P, blobs: B, image_config: ImageConfig) -> Self {
        Self {
            repo,
            publisher,
            images: ImagePipeline::new(blobs, image_config),
        }
    }

    /// Create a new automation at the end of the ordering.
    ///
    /// Any `id` or `position` in `input` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AutoHubError::Validation`] for a bad name or a rejected
    /// image, a blob or storage error from the adapters, or
    /// [`AutoHubError::Notification`] when the automation was stored but the
    /// `created` event could not be delivered.
    #[tracing::instrument(skip(self, input), fields(automation_name = %input.name))]
    pub async fn create_automation(
        &self,
        input: AutomationInput,
    ) -> Result<Automation, AutoHubError> {
        let AutomationInput {
            name, image_upload, ..
        } = input;
        let id = AutomationId::new();

        let image = match image_upload {
            Some(upload) => Some(self.images.store(upload).await?),
            None => None,
        };

        let position = OrderingEngine::new(&self.repo).next_position().await?;
        let url_path = UrlPathResolver::new(&self.repo).resolve(&name, id).await?;

        let automation = Automation {
            id,
            name,
            url_path,
            position,
            image,
        };
        automation.validate()?;

        let created = self.repo.create(automation).await?;
        tracing::info!(automation_id = %created.id, url_path = %created.url_path, "automation created");

        self.notify(EventType::Created, created.clone()).await?;
        Ok(created)
    }

    /// Look up an automation by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`AutoHubError::NotFound`] when no automation with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_automation(&self, id: AutomationId) -> Result<Automation, AutoHubError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Automation",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all automations in display order.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_automations(&self) -> Result<Vec<Automation>, AutoHubError> {
        self.repo.get_all().await
    }

    /// Update the name and image of an existing automation.
    ///
    /// The stored position always wins over the one in `input`. The url path
    /// is only recomputed when the name changed. A new upload replaces the
    /// current image; otherwise `remove_image` clears it.
    ///
    /// # Errors
    ///
    /// Returns [`AutoHubError::NotFound`] if the automation does not exist,
    /// [`AutoHubError::Validation`] for bad input, a blob or storage error,
    /// or [`AutoHubError::Notification`] when the update was stored but the
    /// `updated` event could not be delivered.
    #[tracing::instrument(skip(self, input), fields(automation_id = ?input.id))]
    pub async fn update_automation(
        &self,
        input: AutomationInput,
    ) -> Result<Automation, AutoHubError> {
        let id = input.id.ok_or(ValidationError::MissingId)?;
        let current = self.get_automation(id).await?;
        let previous_image = current.image.as_deref().unwrap_or_default();

        let image = if let Some(upload) = input.image_upload {
            let stored = self.images.store(upload).await?;
            self.images.delete(previous_image).await?;
            Some(stored)
        } else if input.remove_image {
            self.images.delete(previous_image).await?;
            None
        } else {
            current.image.clone()
        };

        let url_path = if input.name == current.name {
            current.url_path
        } else {
            UrlPathResolver::new(&self.repo)
                .resolve(&input.name, id)
                .await?
        };

        let automation = Automation {
            id,
            name: input.name,
            url_path,
            position: current.position,
            image,
        };
        automation.validate()?;

        let updated = self.repo.update(automation).await?;
        tracing::info!(automation_id = %updated.id, url_path = %updated.url_path, "automation updated");

        self.notify(EventType::Updated, updated.clone()).await?;
        Ok(updated)
    }

    /// Delete an automation by id.
    ///
    /// The associated image blob is left in place.
    ///
    /// # Errors
    ///
    /// Returns [`AutoHubError::NotFound`] if the automation does not exist,
    /// a storage error, or [`AutoHubError::Notification`] when the deletion
    /// committed but the `deleted` event could not be delivered.
    #[tracing::instrument(skip(self))]
    pub async fn delete_automation(&self, id: AutomationId) -> Result<(), AutoHubError> {
        let snapshot = self.get_automation(id).await?;
        self.repo.delete(id).await?;
        tracing::info!(automation_id = %id, "automation deleted");

        self.notify(EventType::Deleted, snapshot).await
    }

    /// Exchange the display positions of two automations atomically.
    ///
    /// # Errors
    ///
    /// Returns [`AutoHubError::NotFound`] if either automation is missing,
    /// or a storage error; positions are unchanged on any error.
    pub async fn swap_order(
        &self,
        first: AutomationId,
        second: AutomationId,
    ) -> Result<(), AutoHubError> {
        OrderingEngine::new(&self.repo).swap(first, second).await
    }

    async fn notify(
        &self,
        event_type: EventType,
        automation: Automation,
    ) -> Result<(), AutoHubError> {
        let automation_id = automation.id;
        self.publisher
            .publish(Event::new(event_type, automation))
            .await
            .inspect_err(|err| {
                tracing::error!(
                    %automation_id,
                    event_type = event_type.as_str(),
                    error = %err,
                    "failed to publish automation event"
                );
            })
    }
}
