//! Database repositories for the backup and restore records.
//!
//! Repositories are thin sqlx/Postgres wrappers; the Backup mutations the
//! orchestrator performs are also exposed through the `arkivo_core::BackupStore`
//! trait so the pipeline can run against other stores in tests.

pub mod backup;
pub mod restore;

pub use backup::BackupRepository;
pub use restore::RestoreRepository;

/// Embedded SQL migrations for the backups/restores tables.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
