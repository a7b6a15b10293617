//! Reconciliation of worker outcomes into the record store.
//!
//! The reconciler is the sole writer of terminal state. Its write is
//! idempotent: outcome delivery is at-least-once, and a duplicate must
//! leave the record byte-for-byte identical to the first delivery.

use facebytes_core::{JobId, JobState, Outcome};
use facebytes_db::repositories::JobRepo;
use facebytes_db::DbPool;

/// Merge an executor-reported outcome into the durable job record.
///
/// - First delivery: the record transitions to `SUCCESS`/`FAILURE` and
///   the payload is stored.
/// - Duplicate delivery: discarded with a debug log; the record is
///   untouched.
/// - Unknown id (should not happen given persist-before-enqueue, but is
///   tolerated): logged and discarded rather than crashing the worker.
pub async fn reconcile(pool: &DbPool, id: &JobId, outcome: &Outcome) -> Result<(), sqlx::Error> {
    let (state, result) = match outcome {
        Outcome::Success(payload) => (JobState::Success, payload.to_string()),
        Outcome::Failure(description) => (JobState::Failure, description.clone()),
    };

    let applied = JobRepo::finish(pool, id, state, &result).await?;
    if applied {
        tracing::info!(job_id = %id, state = %state, "Job reconciled");
        return Ok(());
    }

    match JobRepo::find_by_id(pool, id).await? {
        Some(existing) => tracing::debug!(
            job_id = %id,
            state = %existing.state,
            "Duplicate outcome discarded; record is already terminal",
        ),
        None => tracing::warn!(job_id = %id, "Outcome for unknown job id discarded"),
    }
    Ok(())
}
