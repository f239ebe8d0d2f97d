//! Arkivo Core Library
//!
//! This crate provides the domain models, error types, and configuration shared
//! across all Arkivo components: the Backup and Restore records, the fixture
//! document and archive manifest formats, tenant scoping, and the task error
//! type that drives retry decisions in the worker.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod store;
pub mod task_error;

// Re-export commonly used types
pub use config::{
    BackupConfig, BackupTypeConfig, BackupTypes, ModelSelection, StorageConfig, WorkerConfig,
};
pub use error::AppError;
pub use storage_types::StorageBackend;
pub use store::BackupStore;
pub use task_error::{TaskError, TaskResultExt};
