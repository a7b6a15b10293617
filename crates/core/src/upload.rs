//! Upload filename validation.
//!
//! Rejections happen before a job record is ever created, so a bad upload
//! leaves no partial state behind.

use crate::error::CoreError;

/// File extensions accepted for uploaded images (case-insensitive).
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Maximum length of an uploaded filename.
const MAX_FILENAME_LEN: usize = 255;

/// Validate an uploaded image filename.
///
/// Rules:
/// - Must not be empty.
/// - Must not exceed `MAX_FILENAME_LEN` characters.
/// - Must end in one of [`ALLOWED_EXTENSIONS`], compared case-insensitively.
pub fn validate_image_filename(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::Validation(
            "Uploaded file has no filename".to_string(),
        ));
    }
    if name.len() > MAX_FILENAME_LEN {
        return Err(CoreError::Validation(format!(
            "Filename must not exceed {MAX_FILENAME_LEN} characters"
        )));
    }

    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(CoreError::Validation(format!(
            "Invalid file type for '{name}'. Only PNG, JPG, and JPEG are allowed."
        ))),
    }
}
