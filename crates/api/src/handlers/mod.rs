//! HTTP handler implementations, grouped by resource.

pub mod compare;
pub mod recognize;
pub mod result;

use facebytes_core::{JobId, JobState};
use serde::Serialize;

/// Payload returned when a job has been accepted for processing.
#[derive(Debug, Serialize)]
pub struct SubmittedJob {
    pub job_id: JobId,
    pub state: JobState,
}

impl SubmittedJob {
    pub fn new(job_id: JobId) -> Self {
        Self {
            job_id,
            state: JobState::Pending,
        }
    }
}

/// Payload for an upload that was rejected before a job was created.
#[derive(Debug, Serialize)]
pub struct RejectedUpload {
    pub filename: String,
    pub error: String,
}
