//! Restore repository.
//!
//! File resolution happens here at save time: a restore with no own file
//! adopts its linked backup's file; with neither, the insert is rejected
//! before any background work can be scheduled.

use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use arkivo_core::models::fixture::ModelId;
use arkivo_core::models::Restore;
use arkivo_core::AppError;

use crate::BackupRepository;

const RESTORE_COLUMNS: &str = "id, tenant_id, name, file, backup_id, restore_type, \
     cleanup_existing_data, exclude_models_from_import, done, \
     started_at, finished_at, created_at, updated_at";

/// Parameters for creating a restore record.
#[derive(Debug, Clone, Default)]
pub struct NewRestore {
    pub tenant_id: Option<Uuid>,
    pub name: Option<String>,
    pub file: Option<String>,
    pub backup_id: Option<Uuid>,
    pub restore_type: Option<String>,
    pub cleanup_existing_data: bool,
    pub exclude_models_from_import: Vec<ModelId>,
}

/// Repository for the restores table.
#[derive(Clone)]
pub struct RestoreRepository {
    pool: PgPool,
    backups: BackupRepository,
}

impl RestoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: pool.clone(),
            backups: BackupRepository::new(pool),
        }
    }

    /// Insert a new restore record, resolving its file first.
    ///
    /// Rejects synchronously with `AppError::InvalidInput` when neither an
    /// own file nor a linked backup's file is available.
    #[tracing::instrument(skip(self, new), fields(db.table = "restores"))]
    pub async fn create(&self, new: NewRestore) -> Result<Restore, AppError> {
        let linked_backup = match new.backup_id {
            Some(backup_id) => self.backups.get_by_id(backup_id).await?,
            None => None,
        };

        let file = match &new.file {
            Some(file) => file.clone(),
            None => linked_backup
                .as_ref()
                .and_then(|b| b.file.clone())
                .ok_or_else(|| {
                    AppError::InvalidInput("file or backup must be provided".to_string())
                })?,
        };

        let exclude = serde_json::to_value(&new.exclude_models_from_import)
            .map_err(|e| AppError::Internal(format!("Failed to encode exclusion list: {}", e)))?;

        let restore = sqlx::query_as::<Postgres, Restore>(&format!(
            r#"
            INSERT INTO restores
                (tenant_id, name, file, backup_id, restore_type,
                 cleanup_existing_data, exclude_models_from_import)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {RESTORE_COLUMNS}
            "#
        ))
        .bind(new.tenant_id)
        .bind(&new.name)
        .bind(&file)
        .bind(new.backup_id)
        .bind(new.restore_type.as_deref().unwrap_or("all_models"))
        .bind(new.cleanup_existing_data)
        .bind(&exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(restore)
    }

    #[tracing::instrument(skip(self), fields(db.table = "restores"))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Restore>, AppError> {
        let restore = sqlx::query_as::<Postgres, Restore>(&format!(
            "SELECT {RESTORE_COLUMNS} FROM restores WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(restore)
    }
}
