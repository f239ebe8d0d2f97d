//! Configuration module
//!
//! Backup-type configuration is an explicit structure loaded once and passed
//! into the orchestrator at invocation time, never re-queried mid-run. The
//! worker and storage settings follow the same env-driven pattern as the rest
//! of the stack.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::env;
use std::time::Duration;

use crate::models::fixture::ModelId;
use crate::storage_types::StorageBackend;
use crate::AppError;

// Common constants
const DEFAULT_MAX_WORKERS: usize = 4;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY_SECS: u64 = 60;
const DEFAULT_RUN_TIMEOUT_SECS: u64 = 3600;
const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// The models a backup type covers: an explicit ordered list, or everything
/// installed (`"*"` in the configuration, also the fallback for unknown
/// types). Wildcards are enumerated at run time, not cached, because the
/// installed model set may change between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSelection {
    All,
    Models(Vec<ModelId>),
}

impl Serialize for ModelSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ModelSelection::All => serializer.serialize_str("*"),
            ModelSelection::Models(models) => models.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ModelSelection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(s) if s == "*" => Ok(ModelSelection::All),
            serde_json::Value::Array(_) => serde_json::from_value(value)
                .map(ModelSelection::Models)
                .map_err(D::Error::custom),
            other => Err(D::Error::custom(format!(
                "expected \"*\" or a list of model identifiers, got {}",
                other
            ))),
        }
    }
}

/// One configured backup type: a display name and its model selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupTypeConfig {
    pub name: String,
    pub models: ModelSelection,
}

/// Mapping from backup type key to its configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackupTypes(pub HashMap<String, BackupTypeConfig>);

impl BackupTypes {
    /// Model selection for a backup type. Unknown or unconfigured types fall
    /// back to all installed models.
    pub fn models_for_type(&self, backup_type: &str) -> ModelSelection {
        self.0
            .get(backup_type)
            .map(|config| config.models.clone())
            .unwrap_or(ModelSelection::All)
    }
}

/// Configuration consumed by the backup orchestrator.
#[derive(Debug, Clone, Default)]
pub struct BackupConfig {
    pub backup_types: BackupTypes,
    /// Public URL prefix under which media assets are served; stripped from
    /// extracted references to recover storage-relative paths.
    pub public_media_url_prefix: Option<String>,
}

impl BackupConfig {
    /// Load from environment: `ARKIVO_BACKUP_TYPES` (JSON object) and
    /// `ARKIVO_PUBLIC_MEDIA_URL_PREFIX`.
    pub fn from_env() -> Result<Self, AppError> {
        let backup_types = match env::var("ARKIVO_BACKUP_TYPES") {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                AppError::InvalidInput(format!("ARKIVO_BACKUP_TYPES is not valid JSON: {}", e))
            })?,
            Err(_) => BackupTypes::default(),
        };

        Ok(Self {
            backup_types,
            public_media_url_prefix: env::var("ARKIVO_PUBLIC_MEDIA_URL_PREFIX").ok(),
        })
    }
}

/// Storage backend configuration.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    pub backend: Option<StorageBackend>,
    pub local_storage_path: Option<String>,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            backend: env::var("STORAGE_BACKEND")
                .ok()
                .and_then(|s| s.parse().ok()),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
        }
    }
}

/// Worker pool and retry configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub max_workers: usize,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub run_timeout: Duration,
    pub queue_capacity: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
            run_timeout: Duration::from_secs(DEFAULT_RUN_TIMEOUT_SECS),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl WorkerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
            env::var(key)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        Self {
            max_workers: parse_env("ARKIVO_MAX_WORKERS", defaults.max_workers),
            max_retries: parse_env("ARKIVO_MAX_RETRIES", defaults.max_retries),
            retry_delay: Duration::from_secs(parse_env(
                "ARKIVO_RETRY_DELAY_SECS",
                defaults.retry_delay.as_secs(),
            )),
            run_timeout: Duration::from_secs(parse_env(
                "ARKIVO_RUN_TIMEOUT_SECS",
                defaults.run_timeout.as_secs(),
            )),
            queue_capacity: parse_env("ARKIVO_QUEUE_CAPACITY", defaults.queue_capacity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_model_selection_deserialize() {
        let all: ModelSelection = serde_json::from_value(json!("*")).unwrap();
        assert_eq!(all, ModelSelection::All);

        let models: ModelSelection =
            serde_json::from_value(json!(["crm.contact", "crm.company"])).unwrap();
        assert_eq!(
            models,
            ModelSelection::Models(vec![ModelId::from("crm.contact"), ModelId::from("crm.company")])
        );

        assert!(serde_json::from_value::<ModelSelection>(json!("everything")).is_err());
        assert!(serde_json::from_value::<ModelSelection>(json!(42)).is_err());
    }

    #[test]
    fn test_model_selection_serialize_round_trip() {
        let selection = ModelSelection::Models(vec![ModelId::from("crm.contact")]);
        let value = serde_json::to_value(&selection).unwrap();
        assert_eq!(value, json!(["crm.contact"]));
        let back: ModelSelection = serde_json::from_value(value).unwrap();
        assert_eq!(back, selection);

        assert_eq!(serde_json::to_value(ModelSelection::All).unwrap(), json!("*"));
    }

    #[test]
    fn test_backup_types_lookup() {
        let types: BackupTypes = serde_json::from_value(json!({
            "crm_only": {"name": "CRM data", "models": ["crm.contact", "crm.company"]},
            "all_models": {"name": "Everything", "models": "*"}
        }))
        .unwrap();

        assert_eq!(
            types.models_for_type("crm_only"),
            ModelSelection::Models(vec![ModelId::from("crm.contact"), ModelId::from("crm.company")])
        );
        assert_eq!(types.models_for_type("all_models"), ModelSelection::All);
        // Unknown types default to everything.
        assert_eq!(types.models_for_type("nope"), ModelSelection::All);
    }
}
