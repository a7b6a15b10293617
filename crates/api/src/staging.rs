//! Upload staging for the spool directory.
//!
//! Uploaded images are written to the spool directory under a unique name
//! before a job is submitted, and removed by the worker once the job
//! reaches a terminal state. Staging validates the client filename first,
//! so nothing is written to disk for rejected uploads.

use std::path::{Path, PathBuf};

use facebytes_core::upload;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// An uploaded file written to the spool directory.
#[derive(Debug, Clone)]
pub struct StagedFile {
    /// Filename as supplied by the client, used in responses.
    pub original_name: String,
    /// Unique on-disk location under the spool directory.
    pub path: PathBuf,
}

/// Validate and write an upload to the spool directory.
///
/// The on-disk name is prefixed with a fresh UUID so concurrent uploads
/// of the same filename never collide. Any directory components in the
/// client filename are stripped.
pub async fn stage_upload(
    spool_dir: &Path,
    original_name: &str,
    bytes: &[u8],
) -> AppResult<StagedFile> {
    upload::validate_image_filename(original_name)?;

    let base = Path::new(original_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| original_name.to_string());
    let path = spool_dir.join(format!("{}_{base}", Uuid::new_v4()));

    tokio::fs::write(&path, bytes).await.map_err(|e| {
        AppError::InternalError(format!("Could not stage upload '{original_name}': {e}"))
    })?;

    Ok(StagedFile {
        original_name: original_name.to_string(),
        path,
    })
}

/// Copy a staged file to a fresh unique name.
///
/// Batch comparisons give every job its own copy of each input, so a
/// finished job can delete its inputs without racing jobs that share an
/// upload.
pub async fn clone_staged(spool_dir: &Path, staged: &StagedFile) -> AppResult<StagedFile> {
    let base = Path::new(&staged.original_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| staged.original_name.clone());
    let path = spool_dir.join(format!("{}_{base}", Uuid::new_v4()));

    tokio::fs::copy(&staged.path, &path).await.map_err(|e| {
        AppError::InternalError(format!(
            "Could not copy staged upload '{}': {e}",
            staged.original_name
        ))
    })?;

    Ok(StagedFile {
        original_name: staged.original_name.clone(),
        path,
    })
}

/// Best-effort removal of staged files that will never reach a worker.
pub async fn discard(staged: &[StagedFile]) {
    for file in staged {
        if let Err(e) = tokio::fs::remove_file(&file.path).await {
            tracing::debug!(path = %file.path.display(), error = %e, "Could not remove staged upload");
        }
    }
}
