//! Arkivo Worker
//!
//! Background execution for backup runs: a reusable bounded-retry wrapper
//! with fixed delay, and a lightweight in-process queue that dispatches runs
//! onto a bounded worker pool. Durable scheduling and cross-process job state
//! belong to the embedding application's task queue; this crate only provides
//! the retry semantics and pool the backup pipeline needs.

pub mod queue;
pub mod retry;
pub mod telemetry;

pub use queue::{BackupQueue, JobContext};
pub use retry::{run_with_retry, RetryPolicy};
pub use telemetry::init_telemetry;
