//! Job record entity.

use chrono::{DateTime, Utc};
use facebytes_core::{JobId, JobState};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `jobs` table: the durable, queryable status record for
/// one submitted job.
///
/// `result` is `None` while the job is PENDING or RUNNING. On SUCCESS it
/// holds the work function's JSON payload (as text); on FAILURE a
/// human-readable description.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JobRecord {
    pub id: JobId,
    pub job_type: String,
    pub state: JobState,
    pub result: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}
