//! Automation repository port — persistence for automations.

use std::future::Future;

use autohub_domain::automation::Automation;
use autohub_domain::error::AutoHubError;
use autohub_domain::id::AutomationId;

/// Repository for persisting and querying [`Automation`]s.
///
/// Implementations must reject a second live record with the same
/// `url_path` or `position` (e.g. through `UNIQUE` constraints); the
/// application layer only avoids such collisions on a best-effort basis.
pub trait AutomationRepository {
    /// Handle returned by [`begin`](Self::begin).
    type Transaction: AutomationTransaction + Send;

    /// Create a new automation in storage.
    fn create(
        &self,
        automation: Automation,
    ) -> impl Future<Output = Result<Automation, AutoHubError>> + Send;

    /// Get an automation by its unique identifier.
    fn get_by_id(
        &self,
        id: AutomationId,
    ) -> impl Future<Output = Result<Option<Automation>, AutoHubError>> + Send;

    /// Get all automations, ordered by position.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Automation>, AutoHubError>> + Send;

    /// Get the automation currently holding `url_path`.
    fn get_by_url_path(
        &self,
        url_path: &str,
    ) -> impl Future<Output = Result<Option<Automation>, AutoHubError>> + Send;

    /// Highest position in use, or `0` when there are no automations.
    fn max_position(&self) -> impl Future<Output = Result<i64, AutoHubError>> + Send;

    /// Update an existing automation.
    fn update(
        &self,
        automation: Automation,
    ) -> impl Future<Output = Result<Automation, AutoHubError>> + Send;

    /// Delete an automation by its unique identifier.
    fn delete(&self, id: AutomationId) -> impl Future<Output = Result<(), AutoHubError>> + Send;

    /// Start an atomic unit of work.
    ///
    /// Nothing done through the returned handle is visible to others until
    /// [`AutomationTransaction::commit`]; dropping the handle rolls back.
    fn begin(&self) -> impl Future<Output = Result<Self::Transaction, AutoHubError>> + Send;
}

/// Reads and writes issued inside a repository transaction.
pub trait AutomationTransaction {
    /// Get an automation by id, as seen by this transaction.
    fn get_by_id(
        &mut self,
        id: AutomationId,
    ) -> impl Future<Output = Result<Option<Automation>, AutoHubError>> + Send;

    /// Highest position as seen by this transaction, `0` when empty.
    fn max_position(&mut self) -> impl Future<Output = Result<i64, AutoHubError>> + Send;

    /// Overwrite the position of one automation.
    fn set_position(
        &mut self,
        id: AutomationId,
        position: i64,
    ) -> impl Future<Output = Result<(), AutoHubError>> + Send;

    /// Make every write of this transaction durable.
    fn commit(self) -> impl Future<Output = Result<(), AutoHubError>> + Send;
}
