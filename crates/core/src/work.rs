//! Work inputs, outcomes, and the pluggable work function.
//!
//! The engine is agnostic about what a job actually computes. The domain
//! algorithm is supplied as a [`WorkFunction`] implementation; the bundled
//! baseline lives in `facebytes-recognizer`.

use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// WorkInput
// ---------------------------------------------------------------------------

/// Inputs for a single unit of work, referencing files already staged on
/// local disk by the transport layer.
///
/// Staged paths are guaranteed valid for exactly one execution attempt;
/// the worker removes them after the attempt finishes.
#[derive(Debug, Clone)]
pub enum WorkInput {
    /// Find the closest matches for `image_path` among the images under
    /// `reference_dir`.
    Recognize {
        image_path: PathBuf,
        reference_dir: PathBuf,
    },

    /// Decide whether two images show the same face.
    Compare { first: PathBuf, second: PathBuf },
}

impl WorkInput {
    /// Stable job-type label persisted alongside the record.
    pub fn job_type(&self) -> &'static str {
        match self {
            WorkInput::Recognize { .. } => "recognize",
            WorkInput::Compare { .. } => "compare",
        }
    }

    /// Staged upload paths owned by this input (reference directories are
    /// caller-owned and excluded).
    pub fn staged_paths(&self) -> Vec<&Path> {
        match self {
            WorkInput::Recognize { image_path, .. } => vec![image_path.as_path()],
            WorkInput::Compare { first, second } => {
                vec![first.as_path(), second.as_path()]
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result reported by a worker for one execution attempt.
///
/// Failures carry a human-readable description, never raw panic payloads
/// or error internals.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(serde_json::Value),
    Failure(String),
}

// ---------------------------------------------------------------------------
// WorkFunction
// ---------------------------------------------------------------------------

/// The externally supplied computation a worker invokes per job.
///
/// Implementations are synchronous and may be CPU-bound; the worker pool
/// runs them on the blocking thread pool. Errors are returned as plain
/// descriptions and become terminal `FAILURE` records.
pub trait WorkFunction: Send + Sync {
    fn execute(&self, input: &WorkInput) -> Result<serde_json::Value, String>;
}

/// Plain closures are accepted as work functions, which keeps engine tests
/// free of boilerplate.
impl<F> WorkFunction for F
where
    F: Fn(&WorkInput) -> Result<serde_json::Value, String> + Send + Sync,
{
    fn execute(&self, input: &WorkInput) -> Result<serde_json::Value, String> {
        self(input)
    }
}
