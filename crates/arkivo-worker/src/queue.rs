//! In-process backup queue: bounded worker pool and submission.
//!
//! Shutdown: [`BackupQueue::shutdown`] signals the pool to stop; it does not
//! wait for in-flight runs. For graceful shutdown, coordinate with your
//! runtime and allow time for running backups to finish before process exit.

use anyhow::Result;
use std::sync::{Arc, Weak};
use tokio::sync::{mpsc, Semaphore};
use uuid::Uuid;

use arkivo_core::WorkerConfig;

/// Context for backup dispatch.
///
/// Implemented by the embedding application's state. The queue holds a weak
/// reference and calls `dispatch` for each submitted backup; the
/// implementation is expected to run the orchestrator under its retry policy.
#[async_trait::async_trait]
pub trait JobContext: Send + Sync {
    async fn dispatch(self: Arc<Self>, backup_id: Uuid) -> Result<()>;
}

pub struct BackupQueue {
    submit_tx: mpsc::Sender<Uuid>,
    shutdown_tx: mpsc::Sender<()>,
}

impl BackupQueue {
    /// Create a queue with a weak reference to the dispatch context.
    ///
    /// A weak reference keeps the queue from holding its owner alive; once the
    /// context is dropped, submitted backups are discarded with an error log.
    pub fn new(config: WorkerConfig, context: Weak<dyn JobContext>) -> Self {
        let (submit_tx, submit_rx) = mpsc::channel(config.queue_capacity);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        tokio::spawn(Self::worker_pool(config, context, submit_rx, shutdown_rx));

        Self {
            submit_tx,
            shutdown_tx,
        }
    }

    /// Submit a backup for background processing.
    #[tracing::instrument(skip(self), fields(backup.id = %backup_id))]
    pub async fn submit(&self, backup_id: Uuid) -> Result<()> {
        self.submit_tx
            .send(backup_id)
            .await
            .map_err(|_| anyhow::anyhow!("Backup queue is shut down"))?;
        tracing::info!("Backup submitted to queue");
        Ok(())
    }

    async fn worker_pool(
        config: WorkerConfig,
        context: Weak<dyn JobContext>,
        mut submit_rx: mpsc::Receiver<Uuid>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!(
            max_workers = config.max_workers,
            run_timeout_secs = config.run_timeout.as_secs(),
            "Backup queue worker pool started"
        );

        let semaphore = Arc::new(Semaphore::new(config.max_workers));

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!("Backup queue worker pool shutting down");
                    break;
                }
                maybe_id = submit_rx.recv() => {
                    let Some(backup_id) = maybe_id else { break };
                    Self::dispatch_one(&config, &semaphore, &context, backup_id).await;
                }
            }
        }

        tracing::info!("Backup queue worker pool stopped");
    }

    async fn dispatch_one(
        config: &WorkerConfig,
        semaphore: &Arc<Semaphore>,
        context: &Weak<dyn JobContext>,
        backup_id: Uuid,
    ) {
        // Backpressure: wait for a worker slot before taking the next backup.
        let permit = match semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => return,
        };

        let Some(ctx) = context.upgrade() else {
            tracing::error!(backup_id = %backup_id, "Job context was dropped, discarding backup");
            return;
        };

        let run_timeout = config.run_timeout;
        tokio::spawn(async move {
            let _permit = permit;
            match tokio::time::timeout(run_timeout, ctx.dispatch(backup_id)).await {
                Ok(Ok(())) => {
                    tracing::info!(backup_id = %backup_id, "Backup run completed");
                }
                Ok(Err(e)) => {
                    tracing::error!(backup_id = %backup_id, error = %e, "Backup run failed");
                }
                Err(_) => {
                    tracing::error!(
                        backup_id = %backup_id,
                        timeout_secs = run_timeout.as_secs(),
                        "Backup run timed out"
                    );
                }
            }
        });
    }

    /// Signals the worker pool to stop accepting new backups and exit.
    /// Returns immediately; in-flight runs continue until they finish or
    /// time out.
    pub async fn shutdown(&self) {
        tracing::info!("Initiating backup queue shutdown");
        let _ = self.shutdown_tx.send(()).await;
    }
}

impl Clone for BackupQueue {
    fn clone(&self) -> Self {
        Self {
            submit_tx: self.submit_tx.clone(),
            shutdown_tx: self.shutdown_tx.clone(),
        }
    }
}
