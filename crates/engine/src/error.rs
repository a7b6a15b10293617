use facebytes_core::JobId;

use crate::queue::QueueError;

/// Errors returned synchronously from `submit` / `submit_batch`.
///
/// Execution-time failures are never surfaced here; they are recorded as
/// terminal `FAILURE` states and observed via the query path.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The record store rejected the PENDING insert; nothing was enqueued.
    #[error("Failed to persist job record: {0}")]
    Storage(#[from] sqlx::Error),

    /// The descriptor could not be enqueued after the record was created.
    /// The record has been forced to `FAILURE`, never left dangling.
    #[error("Failed to dispatch job: {0}")]
    Queue(#[from] QueueError),
}

/// Errors returned from the read-only query path.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Job not found: {0}")]
    NotFound(JobId),

    #[error("Failed to read job record: {0}")]
    Storage(#[from] sqlx::Error),
}
