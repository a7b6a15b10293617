//! Handlers for the `/compare` endpoints.
//!
//! A comparison job verifies whether two uploaded images show the same
//! subject. Batch comparisons turn a flat list of uploads into pairs
//! according to an explicit [`BatchPairing`] policy.

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use facebytes_core::{upload, BatchPairing, JobId, WorkInput};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::staging::{self, StagedFile};
use crate::state::AppState;

use super::{RejectedUpload, SubmittedJob};

/// A comparison job created from a batch, with the original filenames of
/// both sides.
#[derive(Debug, Serialize)]
pub struct ComparePair {
    pub job_id: JobId,
    pub first: String,
    pub second: String,
}

/// A pair that could not be submitted (the uploads were valid, but the
/// engine rejected the job).
#[derive(Debug, Serialize)]
pub struct FailedPair {
    pub first: String,
    pub second: String,
    pub error: String,
}

/// Response payload for POST /compare/batch.
#[derive(Debug, Serialize)]
pub struct CompareBatchResponse {
    pub jobs: Vec<ComparePair>,
    pub rejected: Vec<RejectedUpload>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_pairs: Vec<FailedPair>,
}

/// POST /compare
///
/// Accept exactly two uploads, `file1` and `file2`, and submit a single
/// comparison job. Returns 202 with the new job id.
pub async fn compare(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut file1: Option<(String, Bytes)> = None;
    let mut file2: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file1" | "file2" => {
                let filename = field.file_name().map(str::to_string).ok_or_else(|| {
                    AppError::BadRequest(format!("The '{name}' field must be a file upload"))
                })?;
                let upload = Some((filename, field.bytes().await?));
                if name == "file1" {
                    file1 = upload;
                } else {
                    file2 = upload;
                }
            }
            other => tracing::debug!(field = %other, "Ignoring unknown multipart field"),
        }
    }

    let (name1, bytes1) =
        file1.ok_or_else(|| AppError::BadRequest("Missing 'file1' upload field".into()))?;
    let (name2, bytes2) =
        file2.ok_or_else(|| AppError::BadRequest("Missing 'file2' upload field".into()))?;

    // Validate both names before anything touches the spool directory.
    upload::validate_image_filename(&name1)?;
    upload::validate_image_filename(&name2)?;

    let staged1 = staging::stage_upload(&state.config.spool_dir, &name1, &bytes1).await?;
    let staged2 = match staging::stage_upload(&state.config.spool_dir, &name2, &bytes2).await {
        Ok(file) => file,
        Err(err) => {
            staging::discard(std::slice::from_ref(&staged1)).await;
            return Err(err);
        }
    };

    let input = WorkInput::Compare {
        first: staged1.path.clone(),
        second: staged2.path.clone(),
    };
    let job_id = match state.engine.submit(input).await {
        Ok(id) => id,
        Err(err) => {
            staging::discard(&[staged1, staged2]).await;
            return Err(err.into());
        }
    };

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: SubmittedJob::new(job_id),
        }),
    ))
}

/// POST /compare/batch
///
/// Accept multiple `files` uploads plus an optional `pairing` field
/// (`adjacent` or `all-pairs`; defaults to the engine configuration).
/// Invalid uploads are reported in `rejected` without sinking the batch;
/// each submitted pair gets its own copies of the staged inputs.
pub async fn compare_batch(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut files: Vec<(String, Bytes)> = Vec::new();
    let mut pairing: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "files" => {
                let filename = field.file_name().map(str::to_string).ok_or_else(|| {
                    AppError::BadRequest("The 'files' field must be a file upload".into())
                })?;
                files.push((filename, field.bytes().await?));
            }
            "pairing" => pairing = Some(field.text().await?),
            other => tracing::debug!(field = %other, "Ignoring unknown multipart field"),
        }
    }

    let policy = match pairing {
        Some(raw) => raw
            .parse::<BatchPairing>()
            .map_err(AppError::BadRequest)?,
        None => state.engine.config().pairing,
    };

    let mut rejected: Vec<RejectedUpload> = Vec::new();
    let mut staged: Vec<StagedFile> = Vec::new();

    for (filename, bytes) in &files {
        if let Err(err) = upload::validate_image_filename(filename) {
            rejected.push(RejectedUpload {
                filename: filename.clone(),
                error: err.to_string(),
            });
            continue;
        }
        match staging::stage_upload(&state.config.spool_dir, filename, bytes).await {
            Ok(file) => staged.push(file),
            Err(err) => {
                staging::discard(&staged).await;
                return Err(err);
            }
        }
    }

    if staged.len() < 2 {
        staging::discard(&staged).await;
        return Err(AppError::BadRequest(
            "A comparison batch needs at least two valid images".into(),
        ));
    }

    let mut jobs: Vec<ComparePair> = Vec::new();
    let mut failed_pairs: Vec<FailedPair> = Vec::new();

    for (i, j) in policy.pairs(staged.len()) {
        let first = clone_for_pair(&state, &staged, i, j).await;
        let (copy_a, copy_b) = match first {
            Ok(pair) => pair,
            Err(err) => {
                staging::discard(&staged).await;
                return Err(err);
            }
        };

        let input = WorkInput::Compare {
            first: copy_a.path.clone(),
            second: copy_b.path.clone(),
        };
        match state.engine.submit(input).await {
            Ok(job_id) => jobs.push(ComparePair {
                job_id,
                first: copy_a.original_name,
                second: copy_b.original_name,
            }),
            Err(err) => {
                staging::discard(&[copy_a.clone(), copy_b.clone()]).await;
                failed_pairs.push(FailedPair {
                    first: copy_a.original_name,
                    second: copy_b.original_name,
                    error: err.to_string(),
                });
            }
        }
    }

    // The workers own the per-pair copies; the shared originals are done.
    staging::discard(&staged).await;

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: CompareBatchResponse {
                jobs,
                rejected,
                failed_pairs,
            },
        }),
    ))
}

/// Copy both sides of a pair so the resulting job owns its inputs.
async fn clone_for_pair(
    state: &AppState,
    staged: &[StagedFile],
    i: usize,
    j: usize,
) -> AppResult<(StagedFile, StagedFile)> {
    let copy_a = staging::clone_staged(&state.config.spool_dir, &staged[i]).await?;
    let copy_b = match staging::clone_staged(&state.config.spool_dir, &staged[j]).await {
        Ok(file) => file,
        Err(err) => {
            staging::discard(std::slice::from_ref(&copy_a)).await;
            return Err(err);
        }
    };
    Ok((copy_a, copy_b))
}
