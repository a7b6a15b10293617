//! The engine context object: submission coordinator, query path, and
//! lifecycle management for the queue and worker pool.

use std::sync::Arc;

use facebytes_core::{JobDescriptor, JobId, JobState, WorkFunction, WorkInput};
use facebytes_db::models::job::JobRecord;
use facebytes_db::repositories::JobRepo;
use facebytes_db::DbPool;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::EngineConfig;
use crate::error::{QueryError, SubmitError};
use crate::queue::{self, JobSender};
use crate::worker;

/// Explicitly constructed engine context, shared as `Arc<JobEngine>`.
///
/// Owns the record store handle, the dispatch queue, and the worker pool.
/// There are no process-wide singletons: everything lives and dies with
/// this object.
pub struct JobEngine {
    pool: DbPool,
    config: EngineConfig,
    sender: JobSender,
    token: CancellationToken,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl JobEngine {
    /// Start the engine: create the dispatch queue and spawn the worker
    /// pool against the given record store and work function.
    pub fn start(pool: DbPool, config: EngineConfig, work: Arc<dyn WorkFunction>) -> Arc<Self> {
        let (sender, receiver) = queue::channel(config.queue_capacity, config.enqueue_wait());
        let token = CancellationToken::new();
        let workers = worker::spawn_workers(pool.clone(), &config, receiver, work, token.clone());

        tracing::info!(
            workers = config.workers,
            queue_capacity = config.queue_capacity,
            "Job engine started",
        );

        Arc::new(JobEngine {
            pool,
            config,
            sender,
            token,
            workers: Mutex::new(workers),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Submit one unit of work. Effectively atomic from the caller's
    /// view:
    ///
    /// 1. Generate a fresh [`JobId`].
    /// 2. Persist a PENDING record; on failure, nothing is enqueued.
    /// 3. Enqueue the descriptor; on failure, the record is forced to
    ///    `FAILURE` with a dispatch-failed description, never left
    ///    dangling PENDING.
    ///
    /// Persist-before-enqueue means a worker can never report on an id
    /// the store does not know about, and a client who holds a returned
    /// id will never see `NotFound`.
    pub async fn submit(&self, input: WorkInput) -> Result<JobId, SubmitError> {
        let id = JobId::new();
        JobRepo::insert_pending(&self.pool, &id, input.job_type()).await?;

        let descriptor = JobDescriptor::new(id.clone(), input);
        if let Err(queue_err) = self.sender.enqueue(descriptor).await {
            let reason = format!("dispatch failed: {queue_err}");
            if let Err(db_err) = JobRepo::finish(&self.pool, &id, JobState::Failure, &reason).await
            {
                tracing::error!(
                    job_id = %id,
                    error = %db_err,
                    "Failed to record dispatch failure",
                );
            }
            tracing::warn!(job_id = %id, error = %queue_err, "Job could not be dispatched");
            return Err(SubmitError::Queue(queue_err));
        }

        tracing::info!(job_id = %id, "Job submitted");
        Ok(id)
    }

    /// Submit a batch, one result per input in order. Partial failure is
    /// expected: some inputs may yield ids while others fail, and no
    /// input's failure affects another's submission.
    pub async fn submit_batch(
        &self,
        inputs: Vec<WorkInput>,
    ) -> Vec<Result<JobId, SubmitError>> {
        let mut results = Vec::with_capacity(inputs.len());
        for input in inputs {
            results.push(self.submit(input).await);
        }
        results
    }

    /// Read-only snapshot of a job record. Never mutates canonical state
    /// and never suspends beyond the store's read latency.
    pub async fn query(&self, id: &JobId) -> Result<JobRecord, QueryError> {
        JobRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| QueryError::NotFound(id.clone()))
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Stop the worker pool and wait for in-flight jobs to finish their
    /// current attempt. Descriptors still queued at this point remain
    /// PENDING in the store.
    pub async fn shutdown(&self) {
        self.token.cancel();
        let handles: Vec<JoinHandle<()>> = self.workers.lock().await.drain(..).collect();
        for handle in handles {
            if let Err(err) = handle.await {
                tracing::warn!(error = %err, "Worker task did not shut down cleanly");
            }
        }
        tracing::info!("Job engine stopped");
    }
}
