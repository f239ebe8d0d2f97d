pub mod backup;
pub mod fixture;
pub mod manifest;
pub mod restore;
pub mod tenant;

pub use backup::Backup;
pub use fixture::{FixtureDocument, FixtureRecord, ModelId};
pub use manifest::{
    BackupManifest, ARCHIVE_MEDIA_PREFIX, FIXTURE_FILE_NAME, FORMAT_VERSION, MANIFEST_FILE_NAME,
};
pub use restore::Restore;
pub use tenant::TenantScope;
