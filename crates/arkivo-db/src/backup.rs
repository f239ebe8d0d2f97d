//! Backup repository: CRUD and orchestrator mutations for the backups table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use arkivo_core::models::Backup;
use arkivo_core::{AppError, BackupStore};

const BACKUP_COLUMNS: &str = "id, tenant_id, name, backup_type, file, done, \
     started_at, finished_at, created_at, updated_at";

/// Repository for the backups table.
#[derive(Clone)]
pub struct BackupRepository {
    pool: PgPool,
}

impl BackupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new backup record in its pending state.
    #[tracing::instrument(skip(self), fields(db.table = "backups"))]
    pub async fn create(
        &self,
        tenant_id: Option<Uuid>,
        name: Option<String>,
        backup_type: String,
    ) -> Result<Backup, AppError> {
        let backup: Backup = sqlx::query_as::<Postgres, Backup>(&format!(
            r#"
            INSERT INTO backups (tenant_id, name, backup_type)
            VALUES ($1, $2, $3)
            RETURNING {BACKUP_COLUMNS}
            "#
        ))
        .bind(tenant_id)
        .bind(&name)
        .bind(&backup_type)
        .fetch_one(&self.pool)
        .await?;
        Ok(backup)
    }

    #[tracing::instrument(skip(self), fields(db.table = "backups"))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Backup>, AppError> {
        let backup = sqlx::query_as::<Postgres, Backup>(&format!(
            "SELECT {BACKUP_COLUMNS} FROM backups WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(backup)
    }

    /// List backups for one tenant (or installation-wide records when
    /// `tenant_id` is None), newest first.
    #[tracing::instrument(skip(self), fields(db.table = "backups"))]
    pub async fn list_for_tenant(&self, tenant_id: Option<Uuid>) -> Result<Vec<Backup>, AppError> {
        let backups = sqlx::query_as::<Postgres, Backup>(&format!(
            r#"
            SELECT {BACKUP_COLUMNS} FROM backups
            WHERE tenant_id IS NOT DISTINCT FROM $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(backups)
    }
}

#[async_trait]
impl BackupStore for BackupRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Backup>, AppError> {
        self.get_by_id(id).await
    }

    #[tracing::instrument(skip(self), fields(db.table = "backups"))]
    async fn mark_started(&self, id: Uuid, started_at: DateTime<Utc>) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE backups SET started_at = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(started_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("backup {}", id)));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "backups"))]
    async fn commit_archive(
        &self,
        id: Uuid,
        file: &str,
        finished_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE backups
            SET file = $2, done = TRUE, finished_at = $3, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(file)
        .bind(finished_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("backup {}", id)));
        }
        Ok(())
    }
}
