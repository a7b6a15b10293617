//! Handler for the `/result/{id}` endpoint.
//!
//! A pure read: the stored record is returned as-is, and querying never
//! changes a job's state.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use facebytes_core::{JobId, JobState};
use facebytes_db::models::job::JobRecord;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Externally visible view of a job record.
#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub job_id: JobId,
    pub job_type: String,
    pub state: JobState,
    /// Present once the job is terminal: the work function's payload on
    /// success, or a failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<JobRecord> for JobStatusResponse {
    fn from(record: JobRecord) -> Self {
        // Success payloads are stored as JSON text. Failure descriptions
        // are always returned as the literal string, even when one would
        // happen to parse as JSON.
        let state = record.state;
        let result = record.result.map(|raw| {
            if state == JobState::Failure {
                return serde_json::Value::String(raw);
            }
            match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(_) => serde_json::Value::String(raw),
            }
        });

        Self {
            job_id: record.id,
            job_type: record.job_type,
            state: record.state,
            result,
            created_at: record.created_at,
            started_at: record.started_at,
            completed_at: record.completed_at,
        }
    }
}

/// GET /result/{id}
///
/// Look up a job by id. Returns 404 for ids that were never issued.
pub async fn get_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<JobStatusResponse>>> {
    let id = JobId::from(id);
    let record = state.engine.query(&id).await?;
    Ok(Json(DataResponse {
        data: record.into(),
    }))
}
