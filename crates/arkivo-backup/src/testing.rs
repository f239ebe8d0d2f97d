//! In-memory collaborators for tests.
//!
//! `MemoryDataStore` stands in for the application's data store and
//! `MemoryBackupStore` for the backup record repository, so the pipeline can
//! be exercised end to end without a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::datastore::{DataStore, DataStoreError, FieldDescriptor};
use arkivo_core::models::{Backup, FixtureDocument, FixtureRecord, ModelId, TenantScope};
use arkivo_core::{AppError, BackupStore};

/// In-memory data store with a registered schema and per-tenant records.
#[derive(Default)]
pub struct MemoryDataStore {
    schemas: BTreeMap<ModelId, HashMap<String, FieldDescriptor>>,
    records: Vec<(Option<Uuid>, FixtureRecord)>,
    serialize_failures: AtomicUsize,
}

impl MemoryDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model with its fields; `true` marks a file-reference field.
    pub fn register_model(&mut self, model: &str, fields: &[(&str, bool)]) {
        let descriptors = fields
            .iter()
            .map(|(name, is_file)| {
                (
                    name.to_string(),
                    FieldDescriptor {
                        is_file_reference: *is_file,
                    },
                )
            })
            .collect();
        self.schemas.insert(ModelId::from(model), descriptors);
    }

    pub fn add_record(&mut self, tenant_id: Option<Uuid>, model: &str, fields: serde_json::Value) {
        self.records.push((
            tenant_id,
            FixtureRecord {
                model: ModelId::from(model),
                fields: fields.as_object().cloned().unwrap_or_default(),
            },
        ));
    }

    /// Make the next `n` serialize calls fail with a transient query error.
    pub fn fail_next_serializations(&self, n: usize) {
        self.serialize_failures.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl DataStore for MemoryDataStore {
    async fn serialize(
        &self,
        scope: &TenantScope,
        models: &[ModelId],
    ) -> Result<FixtureDocument, DataStoreError> {
        let remaining = self.serialize_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.serialize_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(DataStoreError::Query("simulated transient failure".into()));
        }

        let records = self
            .records
            .iter()
            .filter(|(tenant_id, record)| {
                let in_scope = match scope {
                    TenantScope::Installation => true,
                    TenantScope::Tenant(t) => *tenant_id == Some(*t),
                };
                in_scope && models.contains(&record.model)
            })
            .map(|(_, record)| record.clone())
            .collect();
        Ok(FixtureDocument::new(records))
    }

    fn field_descriptor(&self, model: &ModelId, field: &str) -> Option<FieldDescriptor> {
        self.schemas.get(model)?.get(field).copied()
    }

    fn installed_models(&self) -> Vec<ModelId> {
        self.schemas.keys().cloned().collect()
    }
}

/// In-memory backup record store.
#[derive(Default, Clone)]
pub struct MemoryBackupStore {
    inner: Arc<Mutex<HashMap<Uuid, Backup>>>,
}

impl MemoryBackupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh pending record and return it.
    pub fn create(&self, tenant_id: Option<Uuid>, backup_type: &str) -> Backup {
        let now = Utc::now();
        let backup = Backup {
            id: Uuid::new_v4(),
            tenant_id,
            name: None,
            backup_type: backup_type.to_string(),
            file: None,
            done: false,
            started_at: None,
            finished_at: None,
            created_at: now,
            updated_at: now,
        };
        self.inner
            .lock()
            .unwrap()
            .insert(backup.id, backup.clone());
        backup
    }

    pub fn get_sync(&self, id: Uuid) -> Option<Backup> {
        self.inner.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl BackupStore for MemoryBackupStore {
    async fn get(&self, id: Uuid) -> Result<Option<Backup>, AppError> {
        Ok(self.get_sync(id))
    }

    async fn mark_started(&self, id: Uuid, started_at: DateTime<Utc>) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        let backup = inner
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("backup {}", id)))?;
        backup.started_at = Some(started_at);
        backup.updated_at = Utc::now();
        Ok(())
    }

    async fn commit_archive(
        &self,
        id: Uuid,
        file: &str,
        finished_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        let backup = inner
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("backup {}", id)))?;
        backup.file = Some(file.to_string());
        backup.done = true;
        backup.finished_at = Some(finished_at);
        backup.updated_at = Utc::now();
        Ok(())
    }
}
