//! Restore record.
//!
//! A Restore consumes a Backup's archive. It references either a linked
//! Backup (whose file overrides an absent own file) or a directly supplied
//! file; exactly one resolved file must exist before the record may be
//! persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::backup::Backup;
use super::fixture::ModelId;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restore {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub name: Option<String>,
    /// Storage key of the archive to restore from. Adopted from the linked
    /// backup at save time when absent.
    pub file: Option<String>,
    pub backup_id: Option<Uuid>,
    pub restore_type: String,
    /// Purge existing records of the target models before import.
    pub cleanup_existing_data: bool,
    /// Models skipped during import. Replaces the older `exclude` field;
    /// only the import-time exclusion semantics are current.
    pub exclude_models_from_import: Vec<ModelId>,
    pub done: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Restore {
    /// Resolve the archive this restore will read.
    ///
    /// Resolution order: the record's own file wins; otherwise the linked
    /// backup's file is adopted. With neither, the record is invalid and the
    /// save must be rejected before any background work is scheduled.
    pub fn resolve_file(&self, linked_backup: Option<&Backup>) -> Result<String, AppError> {
        if let Some(ref file) = self.file {
            return Ok(file.clone());
        }
        if let Some(backup) = linked_backup {
            if let Some(ref file) = backup.file {
                return Ok(file.clone());
            }
        }
        Err(AppError::InvalidInput(
            "file or backup must be provided".to_string(),
        ))
    }
}

#[cfg(feature = "sqlx")]
impl sqlx::FromRow<'_, sqlx::postgres::PgRow> for Restore {
    fn from_row(row: &sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Restore {
            id: row.get("id"),
            tenant_id: row.get("tenant_id"),
            name: row.get("name"),
            file: row.get("file"),
            backup_id: row.get("backup_id"),
            restore_type: row.get("restore_type"),
            cleanup_existing_data: row.get("cleanup_existing_data"),
            exclude_models_from_import: serde_json::from_value(
                row.get::<serde_json::Value, _>("exclude_models_from_import"),
            )
            .map_err(|e| {
                sqlx::Error::Decode(
                    format!("Failed to parse exclude_models_from_import: {}", e).into(),
                )
            })?,
            done: row.get("done"),
            started_at: row.get("started_at"),
            finished_at: row.get("finished_at"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restore(file: Option<&str>, backup_id: Option<Uuid>) -> Restore {
        let now = Utc::now();
        Restore {
            id: Uuid::new_v4(),
            tenant_id: None,
            name: None,
            file: file.map(String::from),
            backup_id,
            restore_type: "all_models".to_string(),
            cleanup_existing_data: true,
            exclude_models_from_import: Vec::new(),
            done: false,
            started_at: None,
            finished_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn backup_with_file(file: Option<&str>) -> Backup {
        let now = Utc::now();
        Backup {
            id: Uuid::new_v4(),
            tenant_id: None,
            name: None,
            backup_type: "all_models".to_string(),
            file: file.map(String::from),
            done: file.is_some(),
            started_at: Some(now),
            finished_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_own_file_wins() {
        let b = backup_with_file(Some("backups/other.zip"));
        let r = restore(Some("restores/own.zip"), Some(b.id));
        assert_eq!(r.resolve_file(Some(&b)).unwrap(), "restores/own.zip");
    }

    #[test]
    fn test_adopts_linked_backup_file() {
        let b = backup_with_file(Some("backups/archive.zip"));
        let r = restore(None, Some(b.id));
        assert_eq!(r.resolve_file(Some(&b)).unwrap(), "backups/archive.zip");
    }

    #[test]
    fn test_rejected_without_any_file() {
        let r = restore(None, None);
        assert!(matches!(
            r.resolve_file(None),
            Err(AppError::InvalidInput(_))
        ));

        // A linked backup that has no file yet does not satisfy resolution.
        let b = backup_with_file(None);
        let r = restore(None, Some(b.id));
        assert!(r.resolve_file(Some(&b)).is_err());
    }
}
