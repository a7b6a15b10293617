//! Handlers for the `/recognize` endpoints.
//!
//! A recognition job searches a reference directory for the identities
//! closest to an uploaded probe image. Uploads are staged in the spool
//! directory and cleaned up by the worker once the job finishes.

use std::path::PathBuf;

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use facebytes_core::{upload, JobId, WorkInput};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::staging::{self, StagedFile};
use crate::state::AppState;

use super::SubmittedJob;

/// Per-upload outcome of a batch recognition request.
///
/// One bad file does not sink the batch; it is reported alongside the
/// job ids created for the remaining files.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchItem {
    Submitted { filename: String, job_id: JobId },
    Rejected { filename: String, error: String },
}

/// Multipart fields accepted by the recognition endpoints.
struct RecognizeForm {
    files: Vec<(String, Bytes)>,
    reference_dir: Option<String>,
}

/// Read the multipart body, accepting `file` / `files` uploads and a
/// `reference_dir` text field. Unknown fields are ignored.
async fn read_form(mut multipart: Multipart) -> AppResult<RecognizeForm> {
    let mut form = RecognizeForm {
        files: Vec::new(),
        reference_dir: None,
    };

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" | "files" => {
                let filename = field.file_name().map(str::to_string).ok_or_else(|| {
                    AppError::BadRequest(format!("The '{name}' field must be a file upload"))
                })?;
                form.files.push((filename, field.bytes().await?));
            }
            "reference_dir" => form.reference_dir = Some(field.text().await?),
            other => tracing::debug!(field = %other, "Ignoring unknown multipart field"),
        }
    }

    Ok(form)
}

/// POST /recognize
///
/// Accept a single image upload plus a `reference_dir` field, stage the
/// image, and submit a recognition job. Returns 202 with the new job id.
pub async fn recognize(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = read_form(multipart).await?;

    let reference_dir = form
        .reference_dir
        .ok_or_else(|| AppError::BadRequest("Missing 'reference_dir' field".into()))?;
    let (filename, bytes) = form
        .files
        .into_iter()
        .next()
        .ok_or_else(|| AppError::BadRequest("Missing 'file' upload field".into()))?;

    let staged = staging::stage_upload(&state.config.spool_dir, &filename, &bytes).await?;

    let input = WorkInput::Recognize {
        image_path: staged.path.clone(),
        reference_dir: PathBuf::from(reference_dir),
    };
    let job_id = match state.engine.submit(input).await {
        Ok(id) => id,
        Err(err) => {
            staging::discard(std::slice::from_ref(&staged)).await;
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

/// POST /recognize/batch
///
/// Accept multiple `files` uploads plus a shared `reference_dir` field.
/// Each upload is validated and submitted independently; the response
/// lists one item per upload, in upload order.
pub async fn recognize_batch(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = read_form(multipart).await?;

    let reference_dir = form
        .reference_dir
        .ok_or_else(|| AppError::BadRequest("Missing 'reference_dir' field".into()))?;
    if form.files.is_empty() {
        return Err(AppError::BadRequest("Missing 'files' upload fields".into()));
    }

    // One slot per upload so the response preserves upload order.
    let mut items: Vec<Option<BatchItem>> = Vec::with_capacity(form.files.len());
    items.resize_with(form.files.len(), || None);
    let mut staged: Vec<(usize, StagedFile)> = Vec::new();

    for (slot, (filename, bytes)) in form.files.iter().enumerate() {
        if let Err(err) = upload::validate_image_filename(filename) {
            items[slot] = Some(BatchItem::Rejected {
                filename: filename.clone(),
                error: err.to_string(),
            });
            continue;
        }
        match staging::stage_upload(&state.config.spool_dir, filename, bytes).await {
            Ok(file) => staged.push((slot, file)),
            Err(err) => {
                let orphaned: Vec<StagedFile> =
                    staged.into_iter().map(|(_, file)| file).collect();
                staging::discard(&orphaned).await;
                return Err(err);
            }
        }
    }

    let inputs: Vec<WorkInput> = staged
        .iter()
        .map(|(_, file)| WorkInput::Recognize {
            image_path: file.path.clone(),
            reference_dir: PathBuf::from(&reference_dir),
        })
        .collect();
    let results = state.engine.submit_batch(inputs).await;

    for ((slot, file), result) in staged.into_iter().zip(results) {
        items[slot] = Some(match result {
            Ok(job_id) => BatchItem::Submitted {
                filename: file.original_name.clone(),
                job_id,
            },
            Err(err) => {
                staging::discard(std::slice::from_ref(&file)).await;
                BatchItem::Rejected {
                    filename: file.original_name.clone(),
                    error: err.to_string(),
                }
            }
        });
    }

    let items: Vec<BatchItem> = items.into_iter().flatten().collect();

    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: items })))
}
