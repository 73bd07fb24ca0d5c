//! `SQLite` implementation of [`AutomationRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, Sqlite, SqlitePool, Transaction};

use autohub_app::ports::{AutomationRepository, AutomationTransaction};
use autohub_domain::automation::Automation;
use autohub_domain::error::{AutoHubError, NotFoundError};
use autohub_domain::id::AutomationId;

use crate::error::StorageError;

const SELECT_BY_ID: &str = "SELECT * FROM automations WHERE id = ?";
const SELECT_MAX_POSITION: &str = "SELECT COALESCE(MAX(position), 0) FROM automations";
const UPDATE_POSITION: &str = "UPDATE automations SET position = ? WHERE id = ?";

struct Wrapper(Automation);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Automation> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let url_path: String = row.try_get("url_path")?;
        let position: i64 = row.try_get("position")?;
        let image: Option<String> = row.try_get("image")?;

        Ok(Self(Automation {
            id: AutomationId::from_uuid(id),
            name,
            url_path,
            position,
            image,
        }))
    }
}

/// `SQLite`-backed automation repository.
#[derive(Clone)]
pub struct SqliteAutomationRepository {
    pool: SqlitePool,
}

impl SqliteAutomationRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AutomationRepository for SqliteAutomationRepository {
    type Transaction = SqliteAutomationTransaction;

    async fn create(&self, automation: Automation) -> Result<Automation, AutoHubError> {
        sqlx::query(
            "INSERT INTO automations (id, name, url_path, position, image) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(automation.id.as_uuid())
        .bind(&automation.name)
        .bind(&automation.url_path)
        .bind(automation.position)
        .bind(&automation.image)
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        Ok(automation)
    }

    async fn get_by_id(&self, id: AutomationId) -> Result<Option<Automation>, AutoHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<Automation>, AutoHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as("SELECT * FROM automations ORDER BY position")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn get_by_url_path(&self, url_path: &str) -> Result<Option<Automation>, AutoHubError> {
        let row: Option<Wrapper> = sqlx::query_as("SELECT * FROM automations WHERE url_path = ?")
            .bind(url_path)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(Wrapper::maybe(row))
    }

    async fn max_position(&self) -> Result<i64, AutoHubError> {
        let max: i64 = sqlx::query_scalar(SELECT_MAX_POSITION)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(max)
    }

    async fn update(&self, automation: Automation) -> Result<Automation, AutoHubError> {
        let result = sqlx::query(
            "UPDATE automations SET name = ?, url_path = ?, position = ?, image = ? WHERE id = ?",
        )
        .bind(&automation.name)
        .bind(&automation.url_path)
        .bind(automation.position)
        .bind(&automation.image)
        .bind(automation.id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(not_found(automation.id));
        }
        Ok(automation)
    }

    async fn delete(&self, id: AutomationId) -> Result<(), AutoHubError> {
        sqlx::query("DELETE FROM automations WHERE id = ?")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    async fn begin(&self) -> Result<Self::Transaction, AutoHubError> {
        let tx = self.pool.begin().await.map_err(StorageError::from)?;
        Ok(SqliteAutomationTransaction { tx })
    }
}

/// An open `SQLite` transaction. Dropping it without
/// [`commit`](AutomationTransaction::commit) rolls back.
pub struct SqliteAutomationTransaction {
    tx: Transaction<'static, Sqlite>,
}

impl AutomationTransaction for SqliteAutomationTransaction {
    async fn get_by_id(&mut self, id: AutomationId) -> Result<Option<Automation>, AutoHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(StorageError::from)?;
        Ok(Wrapper::maybe(row))
    }

    async fn max_position(&mut self) -> Result<i64, AutoHubError> {
        let max: i64 = sqlx::query_scalar(SELECT_MAX_POSITION)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(StorageError::from)?;
        Ok(max)
    }

    async fn set_position(&mut self, id: AutomationId, position: i64) -> Result<(), AutoHubError> {
        let result = sqlx::query(UPDATE_POSITION)
            .bind(position)
            .bind(id.as_uuid())
            .execute(&mut *self.tx)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn commit(self) -> Result<(), AutoHubError> {
        self.tx.commit().await.map_err(StorageError::from)?;
        Ok(())
    }
}

fn not_found(id: AutomationId) -> AutoHubError {
    NotFoundError {
        entity: "Automation",
        id: id.to_string(),
    }
    .into()
}
