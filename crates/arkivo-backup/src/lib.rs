//! Arkivo Backup Pipeline
//!
//! The backup archive builder: serialize a selected subset of data-store
//! records to a fixture, discover every media asset those records reference,
//! copy the assets into a staging tree tolerating partial failure, and package
//! fixture + assets + manifest into one zip archive persisted through the
//! storage backend.
//!
//! Control flow is strictly forward:
//! orchestrator → serializer → extractor → materializer → packager → commit.

pub mod datastore;
pub mod extract;
pub mod materialize;
pub mod orchestrator;
pub mod package;
pub mod testing;

// Re-export commonly used types
pub use datastore::{DataStore, DataStoreError, FieldDescriptor};
pub use extract::{extract_media_refs, ExtractReport, SkipReason, SkippedRef};
pub use materialize::{materialize_assets, CopyReport, MEDIA_SUBDIR};
pub use orchestrator::{BackupOrchestrator, BackupOutcome};
pub use package::package_archive;
