//! Repository for the `jobs` table.
//!
//! All writes are atomic at record granularity. Terminal immutability is
//! enforced here: [`JobRepo::finish`] only touches rows that are still
//! PENDING or RUNNING, so reconciling the same outcome twice is a no-op.

use chrono::Utc;
use facebytes_core::{JobId, JobState};
use sqlx::SqlitePool;

use crate::models::job::JobRecord;

/// Column list for `jobs` queries.
const COLUMNS: &str = "id, job_type, state, result, created_at, started_at, completed_at";

/// Provides CRUD operations for job records.
pub struct JobRepo;

impl JobRepo {
    /// Insert a fresh PENDING record for a newly assigned id.
    ///
    /// This must complete before the corresponding descriptor becomes
    /// visible to the dispatch queue, so a worker can never report on an
    /// id the store does not know about.
    pub async fn insert_pending(
        pool: &SqlitePool,
        id: &JobId,
        job_type: &str,
    ) -> Result<JobRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO jobs (id, job_type, state, created_at) \
             VALUES (?, ?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JobRecord>(&query)
            .bind(id)
            .bind(job_type)
            .bind(JobState::Pending)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Best-effort transition PENDING -> RUNNING when a worker picks the
    /// job up. A miss (row already terminal or unknown) is not an error;
    /// the terminal write is what matters for correctness.
    pub async fn mark_running(pool: &SqlitePool, id: &JobId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE jobs SET state = ?, started_at = ? WHERE id = ? AND state = ?")
            .bind(JobState::Running)
            .bind(Utc::now())
            .bind(id)
            .bind(JobState::Pending)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Write a terminal state and result payload.
    ///
    /// Only non-terminal rows are updated, which makes the write
    /// idempotent under at-least-once outcome delivery. Returns `true`
    /// if a row transitioned, `false` if the job was already terminal or
    /// does not exist.
    pub async fn finish(
        pool: &SqlitePool,
        id: &JobId,
        state: JobState,
        result: &str,
    ) -> Result<bool, sqlx::Error> {
        debug_assert!(state.is_terminal());
        let updated = sqlx::query(
            "UPDATE jobs \
             SET state = ?, result = ?, completed_at = ? \
             WHERE id = ? AND state IN (?, ?)",
        )
        .bind(state)
        .bind(result)
        .bind(Utc::now())
        .bind(id)
        .bind(JobState::Pending)
        .bind(JobState::Running)
        .execute(pool)
        .await?;
        Ok(updated.rows_affected() > 0)
    }

    /// Fetch a snapshot of a job record by id.
    pub async fn find_by_id(
        pool: &SqlitePool,
        id: &JobId,
    ) -> Result<Option<JobRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = ?");
        sqlx::query_as::<_, JobRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
