//! Archive manifest.
//!
//! The manifest is stored at the archive root, always as the last entry. Its
//! `format_version` field is the forward-compatibility contract: a restore
//! process must check it before assuming the archive layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed in-archive name of the fixture document.
pub const FIXTURE_FILE_NAME: &str = "backup.json";

/// In-archive prefix under which captured media assets are stored.
pub const ARCHIVE_MEDIA_PREFIX: &str = "media/";

/// Fixed in-archive name of the manifest itself.
pub const MANIFEST_FILE_NAME: &str = "backup_manifest.json";

/// Current archive format version.
pub const FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupManifest {
    pub backup_type: String,
    pub created_at: DateTime<Utc>,
    pub json_file: String,
    pub media_directory: String,
    pub format_version: String,
}

impl BackupManifest {
    pub fn new(backup_type: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            backup_type: backup_type.to_string(),
            created_at,
            json_file: FIXTURE_FILE_NAME.to_string(),
            media_directory: ARCHIVE_MEDIA_PREFIX.to_string(),
            format_version: FORMAT_VERSION.to_string(),
        }
    }
}
