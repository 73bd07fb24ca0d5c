//! Ordering engine — unique display positions and atomic swaps.

use autohub_domain::automation::Automation;
use autohub_domain::error::{AutoHubError, NotFoundError};
use autohub_domain::id::AutomationId;

use crate::ports::{AutomationRepository, AutomationTransaction};

/// Maintains the `position` of automations.
pub struct OrderingEngine<'r, R> {
    repo: &'r R,
}

impl<'r, R: AutomationRepository> OrderingEngine<'r, R> {
    pub fn new(repo: &'r R) -> Self {
        Self { repo }
    }

    /// Position for a new automation: one past the current maximum
    /// (`1` on an empty collection).
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn next_position(&self) -> Result<i64, AutoHubError> {
        Ok(self.repo.max_position().await? + 1)
    }

    /// Exchange the positions of `first` and `second` in one transaction.
    ///
    /// `first` is parked on a temporary position past the maximum so no
    /// intermediate write collides with a live position. Any failure drops
    /// the transaction, leaving every position untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AutoHubError::NotFound`] if either automation is missing,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn swap(&self, first: AutomationId, second: AutomationId) -> Result<(), AutoHubError> {
        let mut tx = self.repo.begin().await?;

        let a = load(&mut tx, first).await?;
        let b = load(&mut tx, second).await?;

        let temp = tx.max_position().await? + 1;

        tx.set_position(a.id, temp).await?;
        tx.set_position(b.id, a.position).await?;
        tx.set_position(a.id, b.position).await?;

        tx.commit().await?;

        tracing::info!(
            first = %a.id,
            second = %b.id,
            first_position = b.position,
            second_position = a.position,
            "positions swapped"
        );
        Ok(())
    }
}

async fn load<T: AutomationTransaction>(
    tx: &mut T,
    id: AutomationId,
) -> Result<Automation, AutoHubError> {
    tx.get_by_id(id).await?.ok_or_else(|| {
        NotFoundError {
            entity: "Automation",
            id: id.to_string(),
        }
        .into()
    })
}
