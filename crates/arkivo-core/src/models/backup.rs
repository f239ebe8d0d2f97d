//! Backup record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tenant::TenantScope;

/// Backup type used when none is configured.
pub const DEFAULT_BACKUP_TYPE: &str = "all_models";

/// A logical backup of one tenant's data (or the whole installation when
/// `tenant_id` is None).
///
/// Lifecycle: created with no timestamps; the orchestrator persists
/// `started_at` before any heavy work, then `file + done + finished_at` as a
/// single final update. `done` implies `file` and `finished_at` are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Backup {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub name: Option<String>,
    pub backup_type: String,
    /// Storage key of the persisted archive, set on commit.
    pub file: Option<String>,
    pub done: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Backup {
    pub fn scope(&self) -> TenantScope {
        TenantScope::from(self.tenant_id)
    }

    /// Deterministic archive file name for a run finishing at `finished_at`:
    /// `backup_<tenant_id>_<type>_<YYYYMMDD_HHMMSS>.zip`, with the tenant
    /// segment omitted for installation-wide backups. Second resolution is
    /// enough to keep names unique and sortable across runs.
    pub fn archive_file_name(&self, finished_at: DateTime<Utc>) -> String {
        let stamp = finished_at.format("%Y%m%d_%H%M%S");
        match self.tenant_id {
            Some(tenant_id) => {
                format!("backup_{}_{}_{}.zip", tenant_id, self.backup_type, stamp)
            }
            None => format!("backup_{}_{}.zip", self.backup_type, stamp),
        }
    }
}
