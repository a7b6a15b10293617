//! Long-lived worker tasks executing jobs from the dispatch queue.
//!
//! Each worker runs an independent loop: dequeue -> mark RUNNING ->
//! invoke the work function on the blocking pool -> reconcile the
//! outcome -> remove staged files. A failing or panicking work function
//! produces a `FAILURE` record; it never takes the worker down with it.

use std::sync::Arc;
use std::time::Duration;

use facebytes_core::{JobDescriptor, Outcome, WorkFunction};
use facebytes_db::repositories::JobRepo;
use facebytes_db::DbPool;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::config::EngineConfig;
use crate::queue::JobReceiver;
use crate::reconcile;

/// Spawn the configured number of worker tasks.
pub(crate) fn spawn_workers(
    pool: DbPool,
    config: &EngineConfig,
    receiver: JobReceiver,
    work: Arc<dyn WorkFunction>,
    token: CancellationToken,
) -> Vec<JoinHandle<()>> {
    (0..config.workers)
        .map(|worker_id| {
            tokio::spawn(worker_loop(
                worker_id,
                pool.clone(),
                receiver.clone(),
                Arc::clone(&work),
                config.job_deadline(),
                token.clone(),
            ))
        })
        .collect()
}

async fn worker_loop(
    worker_id: usize,
    pool: DbPool,
    receiver: JobReceiver,
    work: Arc<dyn WorkFunction>,
    deadline: Option<Duration>,
    token: CancellationToken,
) {
    tracing::debug!(worker_id, "Worker started");

    loop {
        let descriptor = tokio::select! {
            _ = token.cancelled() => break,
            next = receiver.dequeue() => match next {
                Some(descriptor) => descriptor,
                None => break,
            },
        };

        process_job(worker_id, &pool, &work, deadline, descriptor).await;
    }

    tracing::debug!(worker_id, "Worker stopped");
}

/// Run a single job end to end. Never returns an error: every failure
/// mode ends up inside the job's own record.
async fn process_job(
    worker_id: usize,
    pool: &DbPool,
    work: &Arc<dyn WorkFunction>,
    deadline: Option<Duration>,
    descriptor: JobDescriptor,
) {
    tracing::debug!(worker_id, job_id = %descriptor.id, "Worker picked up job");

    // Best-effort: the terminal write below is what decides correctness.
    if let Err(err) = JobRepo::mark_running(pool, &descriptor.id).await {
        tracing::warn!(job_id = %descriptor.id, error = %err, "Failed to mark job running");
    }

    let outcome = execute(work, deadline, &descriptor).await;

    if let Err(err) = reconcile::reconcile(pool, &descriptor.id, &outcome).await {
        tracing::error!(job_id = %descriptor.id, error = %err, "Failed to reconcile outcome");
    }

    // Staged uploads are valid for exactly one execution attempt. After a
    // deadline overrun the abandoned blocking call may still be reading
    // them; it can only fail its own discarded result, never the record.
    for path in descriptor.input.staged_paths() {
        if let Err(err) = std::fs::remove_file(path) {
            tracing::debug!(path = %path.display(), error = %err, "Staged file not removed");
        }
    }
}

/// Invoke the work function on the blocking pool, bounded by the
/// per-job deadline when one is configured.
async fn execute(
    work: &Arc<dyn WorkFunction>,
    deadline: Option<Duration>,
    descriptor: &JobDescriptor,
) -> Outcome {
    let input = descriptor.input.clone();
    let work = Arc::clone(work);
    let call = tokio::task::spawn_blocking(move || work.execute(&input));

    match deadline {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(joined) => outcome_from_join(joined),
            // The blocking call cannot be interrupted; it is abandoned and
            // its eventual result discarded.
            Err(_) => Outcome::Failure(format!(
                "Job exceeded deadline of {}s",
                limit.as_secs()
            )),
        },
        None => outcome_from_join(call.await),
    }
}

/// Fold the blocking task's join result into an outcome, converting
/// panics into failure descriptions rather than letting them propagate.
fn outcome_from_join(joined: Result<Result<serde_json::Value, String>, JoinError>) -> Outcome {
    match joined {
        Ok(Ok(payload)) => Outcome::Success(payload),
        Ok(Err(description)) => Outcome::Failure(description),
        Err(err) if err.is_panic() => {
            tracing::error!(error = %err, "Work function panicked");
            Outcome::Failure("Work function panicked".to_string())
        }
        Err(err) => Outcome::Failure(format!("Work function aborted: {err}")),
    }
}
