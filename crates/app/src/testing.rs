//! In-memory port implementations shared by the service tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use autohub_domain::automation::Automation;
use autohub_domain::error::{AutoHubError, NotFoundError};
use autohub_domain::event::Event;
use autohub_domain::id::AutomationId;

use crate::ports::{AutomationRepository, AutomationTransaction, BlobStore, EventPublisher};

type Rows = HashMap<AutomationId, Automation>;

fn unique_violation(what: &str) -> AutoHubError {
    AutoHubError::storage(std::io::Error::other(format!(
        "UNIQUE constraint failed: automations.{what}"
    )))
}

/// Enforces the same uniqueness the `SQLite` schema does.
fn check_unique(rows: &Rows, candidate: &Automation) -> Result<(), AutoHubError> {
    for other in rows.values().filter(|a| a.id != candidate.id) {
        if other.url_path == candidate.url_path {
            return Err(unique_violation("url_path"));
        }
        if other.position == candidate.position {
            return Err(unique_violation("position"));
        }
    }
    Ok(())
}

fn max_of(rows: &Rows) -> i64 {
    rows.values().map(|a| a.position).max().unwrap_or(0)
}

/// Repository double. Clones share the same rows.
#[derive(Clone, Default)]
pub struct InMemoryAutomationRepo {
    rows: Arc<Mutex<Rows>>,
    /// Fail the n-th (1-based) `set_position` of every transaction.
    fail_write_at: Option<usize>,
    fail_create: Arc<AtomicBool>,
}

impl InMemoryAutomationRepo {
    pub fn failing_write_at(n: usize) -> Self {
        Self {
            fail_write_at: Some(n),
            ..Self::default()
        }
    }

    pub fn fail_creates(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn insert(&self, automation: Automation) {
        self.rows
            .lock()
            .unwrap()
            .insert(automation.id, automation);
    }

    pub fn position_of(&self, id: AutomationId) -> Option<i64> {
        self.rows.lock().unwrap().get(&id).map(|a| a.position)
    }

    pub fn snapshot(&self) -> Vec<Automation> {
        let mut all: Vec<Automation> = self.rows.lock().unwrap().values().cloned().collect();
        all.sort_by_key(|a| a.position);
        all
    }
}

impl AutomationRepository for InMemoryAutomationRepo {
    type Transaction = InMemoryTransaction;

    fn create(
        &self,
        automation: Automation,
    ) -> impl Future<Output = Result<Automation, AutoHubError>> + Send {
        let result = if self.fail_create.load(Ordering::SeqCst) {
            Err(AutoHubError::storage(std::io::Error::other("disk I/O error")))
        } else {
            let mut rows = self.rows.lock().unwrap();
            check_unique(&rows, &automation).map(|()| {
                rows.insert(automation.id, automation.clone());
                automation
            })
        };
        async { result }
    }

    fn get_by_id(
        &self,
        id: AutomationId,
    ) -> impl Future<Output = Result<Option<Automation>, AutoHubError>> + Send {
        let result = self.rows.lock().unwrap().get(&id).cloned();
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Automation>, AutoHubError>> + Send {
        let result = self.snapshot();
        async { Ok(result) }
    }

    fn get_by_url_path(
        &self,
        url_path: &str,
    ) -> impl Future<Output = Result<Option<Automation>, AutoHubError>> + Send {
        let result = self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|a| a.url_path == url_path)
            .cloned();
        async { Ok(result) }
    }

    fn max_position(&self) -> impl Future<Output = Result<i64, AutoHubError>> + Send {
        let result = max_of(&self.rows.lock().unwrap());
        async move { Ok(result) }
    }

    fn update(
        &self,
        automation: Automation,
    ) -> impl Future<Output = Result<Automation, AutoHubError>> + Send {
        let mut rows = self.rows.lock().unwrap();
        let result = if rows.contains_key(&automation.id) {
            check_unique(&rows, &automation).map(|()| {
                rows.insert(automation.id, automation.clone());
                automation
            })
        } else {
            Err(NotFoundError {
                entity: "Automation",
                id: automation.id.to_string(),
            }
            .into())
        };
        async { result }
    }

    fn delete(&self, id: AutomationId) -> impl Future<Output = Result<(), AutoHubError>> + Send {
        self.rows.lock().unwrap().remove(&id);
        async { Ok(()) }
    }

    fn begin(&self) -> impl Future<Output = Result<Self::Transaction, AutoHubError>> + Send {
        let tx = InMemoryTransaction {
            shared: Arc::clone(&self.rows),
            staged: self.rows.lock().unwrap().clone(),
            writes: 0,
            fail_write_at: self.fail_write_at,
        };
        async { Ok(tx) }
    }
}

/// Works on a private copy of the rows, published on commit.
pub struct InMemoryTransaction {
    shared: Arc<Mutex<Rows>>,
    staged: Rows,
    writes: usize,
    fail_write_at: Option<usize>,
}

impl AutomationTransaction for InMemoryTransaction {
    fn get_by_id(
        &mut self,
        id: AutomationId,
    ) -> impl Future<Output = Result<Option<Automation>, AutoHubError>> + Send {
        let result = self.staged.get(&id).cloned();
        async { Ok(result) }
    }

    fn max_position(&mut self) -> impl Future<Output = Result<i64, AutoHubError>> + Send {
        let result = max_of(&self.staged);
        async move { Ok(result) }
    }

    fn set_position(
        &mut self,
        id: AutomationId,
        position: i64,
    ) -> impl Future<Output = Result<(), AutoHubError>> + Send {
        self.writes += 1;
        let result = if self.fail_write_at == Some(self.writes) {
            Err(AutoHubError::storage(std::io::Error::other("write failed")))
        } else if let Some(mut candidate) = self.staged.get(&id).cloned() {
            candidate.position = position;
            check_unique(&self.staged, &candidate).map(|()| {
                self.staged.insert(id, candidate);
            })
        } else {
            Ok(())
        };
        async { result }
    }

    fn commit(self) -> impl Future<Output = Result<(), AutoHubError>> + Send {
        *self.shared.lock().unwrap() = self.staged;
        async { Ok(()) }
    }
}

/// Blob store double. Clones share the same blobs.
#[derive(Clone, Default)]
pub struct InMemoryBlobStore {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryBlobStore {
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn put(&self, name: &str, content: &[u8]) {
        self.blobs
            .lock()
            .unwrap()
            .insert(name.to_string(), content.to_vec());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(name)
    }

    pub fn count(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn write(
        &self,
        name: &str,
        content: &[u8],
    ) -> impl Future<Output = Result<(), AutoHubError>> + Send {
        let result = if self.fail_writes.load(Ordering::SeqCst) {
            Err(AutoHubError::blob(std::io::Error::other("no space left")))
        } else {
            self.put(name, content);
            Ok(())
        };
        async { result }
    }

    fn delete(&self, name: &str) -> impl Future<Output = Result<bool, AutoHubError>> + Send {
        let existed = self.blobs.lock().unwrap().remove(name).is_some();
        async move { Ok(existed) }
    }
}

/// Publisher double recording every delivered event.
#[derive(Clone, Default)]
pub struct RecordingPublisher {
    events: Arc<Mutex<Vec<Event>>>,
    fail: Arc<AtomicBool>,
    attempts: Arc<AtomicUsize>,
}

impl RecordingPublisher {
    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), AutoHubError>> + Send {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let result = if self.fail.load(Ordering::SeqCst) {
            Err(AutoHubError::notification(std::io::Error::other(
                "broker unreachable",
            )))
        } else {
            self.events.lock().unwrap().push(event);
            Ok(())
        };
        async { result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn automation(url_path: &str, position: i64) -> Automation {
        Automation::builder()
            .name(url_path)
            .url_path(url_path)
            .position(position)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_return_not_found_when_updating_missing_row() {
        let repo = InMemoryAutomationRepo::default();

        let result = repo.update(automation("ghost", 1)).await;

        assert!(matches!(result, Err(AutoHubError::NotFound(_))));
        assert!(repo.snapshot().is_empty());
    }

    #[tokio::test]
    async fn should_replace_existing_row_on_update() {
        let repo = InMemoryAutomationRepo::default();
        let mut stored = automation("report", 1);
        repo.insert(stored.clone());

        stored.name = "Weekly report".to_string();
        repo.update(stored.clone()).await.unwrap();

        assert_eq!(repo.snapshot(), vec![stored]);
    }
}
