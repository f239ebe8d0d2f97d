//! Shared key generation for persisted backup archives.
//!
//! Key format: `backups/{filename}` for installation-wide archives, otherwise
//! `backups/{tenant_id}/{filename}`.

use uuid::Uuid;

/// Generate the storage key under which a backup archive is persisted.
///
/// Tenant-scoped archives are prefixed with the tenant id so per-tenant
/// listing and cleanup stay cheap on prefix-aware backends.
pub fn archive_key(tenant_id: Option<Uuid>, filename: &str) -> String {
    match tenant_id {
        Some(tenant_id) => format!("backups/{}/{}", tenant_id, filename),
        None => format!("backups/{}", filename),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_key() {
        let tenant_id = Uuid::new_v4();
        assert_eq!(
            archive_key(Some(tenant_id), "backup_all_models_20260823_143005.zip"),
            format!("backups/{}/backup_all_models_20260823_143005.zip", tenant_id)
        );
        assert_eq!(
            archive_key(None, "backup_all_models_20260823_143005.zip"),
            "backups/backup_all_models_20260823_143005.zip"
        );
    }
}
