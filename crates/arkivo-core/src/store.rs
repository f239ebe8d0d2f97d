//! Backup record persistence seam.
//!
//! The orchestrator mutates the Backup record through this trait so the
//! pipeline can run against Postgres in production and an in-memory store in
//! tests. Only the orchestrator's three touch points are exposed; record
//! creation and listing belong to the repository layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::Backup;
use crate::AppError;

#[async_trait]
pub trait BackupStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Backup>, AppError>;

    /// Persist `started_at` before any heavy work so a record stuck in
    /// `started` with no `finished_at` is diagnosable as a crashed or
    /// retrying run.
    async fn mark_started(&self, id: Uuid, started_at: DateTime<Utc>) -> Result<(), AppError>;

    /// Final atomic update: file + done + finished_at together. A consumer
    /// polling the record never observes `done` with a missing file.
    async fn commit_archive(
        &self,
        id: Uuid,
        file: &str,
        finished_at: DateTime<Utc>,
    ) -> Result<(), AppError>;
}
