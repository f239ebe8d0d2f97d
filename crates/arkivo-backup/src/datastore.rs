//! Data-store collaborator seam.
//!
//! The data store itself (query layer, serialization engine, installed model
//! registry) is external to this crate; the pipeline works against this trait.
//! The application implements it once; tests use the in-memory store from
//! [`crate::testing`].

use async_trait::async_trait;
use thiserror::Error;

use arkivo_core::models::{FixtureDocument, ModelId, TenantScope};

/// Declared type information for one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldDescriptor {
    /// True when the field holds a reference to an externally-stored file.
    pub is_file_reference: bool,
}

impl FieldDescriptor {
    pub fn file_reference() -> Self {
        Self {
            is_file_reference: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum DataStoreError {
    #[error("Query failed: {0}")]
    Query(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

/// Data-store query and serialization interface.
///
/// `serialize` produces an ordered record export for the given models, scoped
/// to the tenant (unscoped for installation-wide operations). Field metadata
/// and the installed model set are read synchronously; both may change
/// between runs and must not be cached by callers.
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn serialize(
        &self,
        scope: &TenantScope,
        models: &[ModelId],
    ) -> Result<FixtureDocument, DataStoreError>;

    /// Field metadata lookup. None when the model or field is unknown.
    fn field_descriptor(&self, model: &ModelId, field: &str) -> Option<FieldDescriptor>;

    /// All model identifiers known to the installation, enumerated now.
    fn installed_models(&self) -> Vec<ModelId>;
}
