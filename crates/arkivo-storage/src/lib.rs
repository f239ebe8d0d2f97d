//! Arkivo Storage Library
//!
//! Storage abstraction for the object-storage backend that holds media assets
//! and persisted backup archives. The `Storage` trait is the seam the backup
//! pipeline works against; a local-filesystem implementation ships here, and
//! remote blob stores plug in behind the same trait.
//!
//! # Storage key format
//!
//! Keys are storage-relative paths. Media assets keep whatever relative path
//! the application stored them under; backup archives live under a dedicated
//! prefix, `backups/{filename}` for installation-wide archives and
//! `backups/{tenant_id}/{filename}` otherwise. Keys must not contain `..` or
//! a leading `/`. Archive key generation is centralized in the `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use arkivo_core::StorageBackend;
pub use factory::create_storage;
pub use keys::archive_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use traits::{ByteStream, Storage, StorageError, StorageResult};
