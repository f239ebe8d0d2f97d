//! Backup Orchestrator.
//!
//! The retryable unit of work: resolve backup-type configuration, export the
//! selected models for the record's tenant scope, capture referenced media,
//! package everything into an archive, and commit it to the Backup record.
//! Each attempt runs in a fresh temporary workspace; nothing from a failed
//! prior attempt is reused. On any error the whole run fails as a unit and is
//! retried by the caller's retry policy; exhausted retries leave the record
//! in `started` with `done = false`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::datastore::DataStore;
use crate::extract::extract_media_refs;
use crate::materialize::materialize_assets;
use crate::package::package_archive;
use arkivo_core::config::{BackupConfig, ModelSelection};
use arkivo_core::models::{Backup, ModelId};
use arkivo_core::{BackupStore, TaskError};
use arkivo_storage::{archive_key, Storage};

/// Result of one successful backup run.
#[derive(Debug)]
pub struct BackupOutcome {
    pub backup_id: Uuid,
    /// Storage key the archive was persisted under.
    pub archive_key: String,
    pub record_count: usize,
    pub copied: Vec<String>,
    pub missing: Vec<String>,
    pub finished_at: DateTime<Utc>,
}

pub struct BackupOrchestrator {
    store: Arc<dyn BackupStore>,
    data_store: Arc<dyn DataStore>,
    storage: Arc<dyn Storage>,
    config: BackupConfig,
}

impl BackupOrchestrator {
    pub fn new(
        store: Arc<dyn BackupStore>,
        data_store: Arc<dyn DataStore>,
        storage: Arc<dyn Storage>,
        config: BackupConfig,
    ) -> Self {
        Self {
            store,
            data_store,
            storage,
            config,
        }
    }

    /// Run one backup to completion.
    ///
    /// Pipeline: mark started → resolve models → export fixture → extract
    /// references → materialize assets → package → upload → commit. Strictly
    /// sequential; data flows forward only.
    #[tracing::instrument(skip(self), fields(backup.id = %backup_id))]
    pub async fn run(&self, backup_id: Uuid) -> Result<BackupOutcome> {
        let backup = self
            .store
            .get(backup_id)
            .await
            .context("Failed to load backup record")?
            .ok_or_else(|| {
                TaskError::unrecoverable(anyhow::anyhow!("Backup {} not found", backup_id))
            })?;

        let scope = backup.scope();
        tracing::info!(
            tenant = %scope,
            backup_type = %backup.backup_type,
            "Processing backup"
        );

        // Persisted before any heavy work so a crashed run is diagnosable.
        self.store
            .mark_started(backup_id, Utc::now())
            .await
            .context("Failed to mark backup started")?;

        let models = self.resolve_models(&backup);
        tracing::debug!(models = models.len(), "Resolved model selection");

        // Fresh workspace per attempt; dropped (and deleted) on every exit path.
        let workspace = tempfile::tempdir().context("Failed to create backup workspace")?;

        let fixture = self
            .data_store
            .serialize(&scope, &models)
            .await
            .context("Record export failed")?;
        let record_count = fixture.len();

        let fixture_path = workspace.path().join("fixture.json");
        let fixture_json =
            serde_json::to_vec_pretty(&fixture).context("Failed to encode fixture")?;
        tokio::fs::write(&fixture_path, &fixture_json)
            .await
            .context("Failed to write fixture file")?;

        let extract_report =
            extract_media_refs(&fixture, self.data_store.as_ref(), self.config.public_media_url_prefix.as_deref());
        let copy_report =
            materialize_assets(self.storage.as_ref(), &extract_report.refs, workspace.path())
                .await
                .context("Asset materialization failed")?;

        let finished_at = Utc::now();
        let archive_name = backup.archive_file_name(finished_at);
        let archive_path = workspace.path().join(&archive_name);

        let staging_root = workspace.path().to_path_buf();
        let backup_type = backup.backup_type.clone();
        let fixture_path_owned = fixture_path.clone();
        let archive_path = tokio::task::spawn_blocking(move || {
            package_archive(
                &fixture_path_owned,
                &staging_root,
                &archive_path,
                &backup_type,
                finished_at,
            )
        })
        .await
        .context("Packaging task panicked")?
        .context("Archive packaging failed")?;

        let key = archive_key(backup.tenant_id, &archive_name);
        self.upload_archive(&archive_path, &key).await?;

        self.store
            .commit_archive(backup_id, &key, finished_at)
            .await
            .context("Failed to commit archive to backup record")?;

        tracing::info!(
            archive = %key,
            records = record_count,
            copied = copy_report.copied.len(),
            missing = copy_report.missing.len(),
            "Backup finished"
        );

        Ok(BackupOutcome {
            backup_id,
            archive_key: key,
            record_count,
            copied: copy_report.copied,
            missing: copy_report.missing,
            finished_at,
        })
    }

    /// Resolve the backup type to its model list. Wildcards and unknown types
    /// enumerate all installed models now, not from a cache, since both the
    /// configuration and the installed set may change between runs.
    fn resolve_models(&self, backup: &Backup) -> Vec<ModelId> {
        match self.config.backup_types.models_for_type(&backup.backup_type) {
            ModelSelection::All => self.data_store.installed_models(),
            ModelSelection::Models(models) => models,
        }
    }

    async fn upload_archive(&self, archive_path: &std::path::Path, key: &str) -> Result<()> {
        let content_length = tokio::fs::metadata(archive_path).await?.len();
        let file = tokio::fs::File::open(archive_path)
            .await
            .with_context(|| format!("Failed to open archive {}", archive_path.display()))?;

        self.storage
            .upload_stream(key, Some(content_length), Box::pin(file))
            .await
            .with_context(|| format!("Failed to persist archive under {}", key))?;
        Ok(())
    }
}
