//! End-to-end pipeline tests: in-memory data store and backup records,
//! real local storage, real zip archives.

use serde_json::json;
use std::io::Read;
use std::sync::Arc;
use uuid::Uuid;

use arkivo_backup::testing::{MemoryBackupStore, MemoryDataStore};
use arkivo_backup::{BackupOrchestrator, BackupOutcome};
use arkivo_core::config::{BackupConfig, BackupTypeConfig, BackupTypes, ModelSelection};
use arkivo_core::models::{FIXTURE_FILE_NAME, MANIFEST_FILE_NAME};
use arkivo_core::TaskError;
use arkivo_storage::{LocalStorage, Storage};

struct Harness {
    storage_dir: tempfile::TempDir,
    storage: Arc<LocalStorage>,
    backups: MemoryBackupStore,
}

impl Harness {
    async fn new() -> Self {
        let storage_dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(LocalStorage::new(storage_dir.path()).await.unwrap());
        Self {
            storage_dir,
            storage,
            backups: MemoryBackupStore::new(),
        }
    }

    async fn put_asset(&self, key: &str, data: &[u8]) {
        let reader = Box::pin(std::io::Cursor::new(data.to_vec()))
            as std::pin::Pin<Box<dyn tokio::io::AsyncRead + Send + Unpin>>;
        self.storage
            .upload_stream(key, Some(data.len() as u64), reader)
            .await
            .unwrap();
    }

    fn orchestrator(&self, data_store: MemoryDataStore, config: BackupConfig) -> BackupOrchestrator {
        BackupOrchestrator::new(
            Arc::new(self.backups.clone()),
            Arc::new(data_store),
            self.storage.clone(),
            config,
        )
    }

    fn open_archive(&self, key: &str) -> zip::ZipArchive<std::fs::File> {
        let file = std::fs::File::open(self.storage_dir.path().join(key)).unwrap();
        zip::ZipArchive::new(file).unwrap()
    }
}

fn crm_config() -> BackupConfig {
    let mut types = BackupTypes::default();
    types.0.insert(
        "crm_only".to_string(),
        BackupTypeConfig {
            name: "CRM data".to_string(),
            models: ModelSelection::Models(vec!["crm.contact".into()]),
        },
    );
    BackupConfig {
        backup_types: types,
        public_media_url_prefix: Some("media/".to_string()),
    }
}

fn contact_store(tenant_id: Uuid) -> MemoryDataStore {
    let mut store = MemoryDataStore::new();
    store.register_model("crm.contact", &[("name", false), ("avatar", true)]);
    store.add_record(
        Some(tenant_id),
        "crm.contact",
        json!({"name": "Ada", "avatar": "/media/avatars/ada.png"}),
    );
    store.add_record(
        Some(tenant_id),
        "crm.contact",
        json!({"name": "Alan", "avatar": "/media/avatars/alan.png"}),
    );
    store.add_record(
        Some(tenant_id),
        "crm.contact",
        json!({"name": "Grace", "avatar": "/media/avatars/grace.png"}),
    );
    store
}

fn entry_names(archive: &mut zip::ZipArchive<std::fs::File>) -> Vec<String> {
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

fn read_entry(archive: &mut zip::ZipArchive<std::fs::File>, name: &str) -> Vec<u8> {
    let mut entry = archive.by_name(name).unwrap();
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf).unwrap();
    buf
}

#[tokio::test]
async fn test_tenant_backup_with_partially_missing_assets() {
    let harness = Harness::new().await;
    let tenant_id = Uuid::new_v4();

    // Two of the three referenced avatars exist in storage.
    harness.put_asset("avatars/ada.png", b"ada-bytes").await;
    harness.put_asset("avatars/alan.png", b"alan-bytes").await;

    let orchestrator = harness.orchestrator(contact_store(tenant_id), crm_config());
    let backup = harness.backups.create(Some(tenant_id), "crm_only");

    let outcome: BackupOutcome = orchestrator.run(backup.id).await.unwrap();

    assert_eq!(outcome.record_count, 3);
    assert_eq!(outcome.copied, vec!["avatars/ada.png", "avatars/alan.png"]);
    assert_eq!(outcome.missing, vec!["avatars/grace.png"]);
    assert!(outcome
        .archive_key
        .starts_with(&format!("backups/{}/backup_{}_crm_only_", tenant_id, tenant_id)));

    // Record committed: archive key persisted, lifecycle timestamps set.
    let record = harness.backups.get_sync(backup.id).unwrap();
    assert!(record.done);
    assert_eq!(record.file.as_deref(), Some(outcome.archive_key.as_str()));
    assert!(record.started_at.is_some());
    assert_eq!(record.finished_at, Some(outcome.finished_at));

    // Archive layout: fixture first, manifest last, only resolved assets between.
    let mut archive = harness.open_archive(&outcome.archive_key);
    let names = entry_names(&mut archive);
    assert_eq!(names.first().map(String::as_str), Some(FIXTURE_FILE_NAME));
    assert_eq!(names.last().map(String::as_str), Some(MANIFEST_FILE_NAME));
    assert!(names.contains(&"media/avatars/ada.png".to_string()));
    assert!(names.contains(&"media/avatars/alan.png".to_string()));
    assert!(!names.iter().any(|n| n.contains("grace")));

    // Fixture survives the round trip byte-meaningfully.
    let fixture: serde_json::Value =
        serde_json::from_slice(&read_entry(&mut archive, FIXTURE_FILE_NAME)).unwrap();
    let records = fixture.as_array().unwrap();
    assert_eq!(records.len(), 3);
    for record in records {
        assert_eq!(record["model"], "crm.contact");
        assert!(record["fields"].is_object());
    }

    assert_eq!(
        read_entry(&mut archive, "media/avatars/ada.png"),
        b"ada-bytes"
    );

    let manifest: serde_json::Value =
        serde_json::from_slice(&read_entry(&mut archive, MANIFEST_FILE_NAME)).unwrap();
    assert_eq!(manifest["format_version"], "1.0");
    assert_eq!(manifest["backup_type"], "crm_only");
    assert_eq!(manifest["json_file"], FIXTURE_FILE_NAME);
    assert_eq!(manifest["media_directory"], "media/");
    assert!(manifest["created_at"].is_string());
}

#[tokio::test]
async fn test_installation_backup_of_unknown_type_covers_everything() {
    let harness = Harness::new().await;
    let tenant_id = Uuid::new_v4();

    let mut data_store = MemoryDataStore::new();
    data_store.register_model("crm.contact", &[("name", false)]);
    data_store.register_model("blog.post", &[("title", false)]);
    data_store.add_record(Some(tenant_id), "crm.contact", json!({"name": "Ada"}));
    data_store.add_record(None, "blog.post", json!({"title": "Hello"}));
    data_store.add_record(Some(Uuid::new_v4()), "blog.post", json!({"title": "World"}));

    // No configured types at all; "everything" is unknown and falls back to
    // all installed models, and the installation scope spans all tenants.
    let orchestrator = harness.orchestrator(data_store, BackupConfig::default());
    let backup = harness.backups.create(None, "everything");

    let outcome = orchestrator.run(backup.id).await.unwrap();

    assert_eq!(outcome.record_count, 3);
    assert!(outcome
        .archive_key
        .starts_with("backups/backup_everything_"));
    assert!(harness.backups.get_sync(backup.id).unwrap().done);
}

#[tokio::test]
async fn test_configured_type_filters_models_and_scope() {
    let harness = Harness::new().await;
    let tenant_id = Uuid::new_v4();
    let other_tenant = Uuid::new_v4();

    let mut data_store = contact_store(tenant_id);
    data_store.register_model("blog.post", &[("title", false)]);
    data_store.add_record(Some(tenant_id), "blog.post", json!({"title": "Excluded"}));
    data_store.add_record(
        Some(other_tenant),
        "crm.contact",
        json!({"name": "Other", "avatar": "/media/avatars/other.png"}),
    );

    harness.put_asset("avatars/other.png", b"other").await;

    let orchestrator = harness.orchestrator(data_store, crm_config());
    let backup = harness.backups.create(Some(tenant_id), "crm_only");

    let outcome = orchestrator.run(backup.id).await.unwrap();

    // Only this tenant's crm.contact rows; no blog.post, no other tenant.
    assert_eq!(outcome.record_count, 3);
    assert!(!outcome.copied.contains(&"avatars/other.png".to_string()));

    let mut archive = harness.open_archive(&outcome.archive_key);
    let fixture: serde_json::Value =
        serde_json::from_slice(&read_entry(&mut archive, FIXTURE_FILE_NAME)).unwrap();
    assert!(fixture
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["model"] == "crm.contact"));
}

#[tokio::test]
async fn test_missing_backup_record_is_unrecoverable() {
    let harness = Harness::new().await;
    let orchestrator = harness.orchestrator(MemoryDataStore::new(), BackupConfig::default());

    let err = orchestrator.run(Uuid::new_v4()).await.unwrap_err();
    let unrecoverable = err
        .downcast_ref::<TaskError>()
        .map(|te| !te.is_recoverable())
        .unwrap_or(false);
    assert!(unrecoverable);
}

#[tokio::test]
async fn test_backup_with_no_media_references_still_packages() {
    let harness = Harness::new().await;
    let tenant_id = Uuid::new_v4();

    let mut data_store = MemoryDataStore::new();
    data_store.register_model("crm.contact", &[("name", false)]);
    data_store.add_record(Some(tenant_id), "crm.contact", json!({"name": "Ada"}));

    let orchestrator = harness.orchestrator(data_store, BackupConfig::default());
    let backup = harness.backups.create(Some(tenant_id), "all_models");

    let outcome = orchestrator.run(backup.id).await.unwrap();
    assert!(outcome.copied.is_empty());
    assert!(outcome.missing.is_empty());

    let mut archive = harness.open_archive(&outcome.archive_key);
    let names = entry_names(&mut archive);
    assert_eq!(names, vec![FIXTURE_FILE_NAME, MANIFEST_FILE_NAME]);
}
