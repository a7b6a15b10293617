//! Baseline pixel-embedding recognition engine.
//!
//! Implements the [`WorkFunction`] plugin with a deliberately simple
//! algorithm: images are reduced to a small grayscale thumbnail and
//! compared by root-mean-square pixel distance. It stands in for a real
//! face model behind the same interface, so the engine, transport, and
//! tests exercise true decode-and-compare work without a GPU stack.
//!
//! Result payloads mirror the shapes clients of the original service
//! expect: `verify`-style objects for comparisons and ranked match lists
//! for recognition.

use std::cmp::Ordering;
use std::path::Path;

use facebytes_core::upload;
use facebytes_core::{WorkFunction, WorkInput};
use image::imageops::FilterType;

/// Thumbnail edge length; embeddings have `THUMB * THUMB` components.
const THUMB: u32 = 16;

/// Identifier reported in result payloads.
const MODEL_NAME: &str = "pixel-embedding-v1";

/// Pixel-embedding work function.
#[derive(Debug, Clone)]
pub struct PixelEngine {
    /// Distances at or below this are considered a match.
    pub threshold: f32,
    /// Maximum number of identities returned per recognition job.
    pub max_matches: usize,
}

impl Default for PixelEngine {
    fn default() -> Self {
        Self {
            threshold: 0.25,
            max_matches: 5,
        }
    }
}

impl WorkFunction for PixelEngine {
    fn execute(&self, input: &WorkInput) -> Result<serde_json::Value, String> {
        match input {
            WorkInput::Compare { first, second } => self.verify(first, second),
            WorkInput::Recognize {
                image_path,
                reference_dir,
            } => self.recognize(image_path, reference_dir),
        }
    }
}

impl PixelEngine {
    /// Pairwise comparison of two images.
    fn verify(&self, first: &Path, second: &Path) -> Result<serde_json::Value, String> {
        let a = embed(first)?;
        let b = embed(second)?;
        let distance = distance(&a, &b);

        Ok(serde_json::json!({
            "verified": distance <= self.threshold,
            "distance": distance,
            "threshold": self.threshold,
            "model": MODEL_NAME,
        }))
    }

    /// Rank the images under `reference_dir` by similarity to the probe.
    ///
    /// Unreadable reference images are skipped with a warning rather than
    /// failing the whole job; an unreadable probe is a job failure.
    fn recognize(&self, probe: &Path, reference_dir: &Path) -> Result<serde_json::Value, String> {
        let probe_embedding = embed(probe)?;

        let entries = std::fs::read_dir(reference_dir).map_err(|e| {
            format!(
                "Could not read reference directory '{}': {e}",
                reference_dir.display()
            )
        })?;

        let mut scored: Vec<(String, f32)> = Vec::new();
        let mut searched = 0usize;

        for entry in entries {
            let entry = entry.map_err(|e| format!("Could not list reference directory: {e}"))?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            if upload::validate_image_filename(&name).is_err() {
                continue;
            }
            searched += 1;

            match embed(&path) {
                Ok(embedding) => {
                    scored.push((path.display().to_string(), distance(&probe_embedding, &embedding)));
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "Skipping unreadable reference image");
                }
            }
        }

        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        scored.truncate(self.max_matches);

        let matches: Vec<serde_json::Value> = scored
            .into_iter()
            .map(|(identity, distance)| {
                serde_json::json!({
                    "identity": identity,
                    "distance": distance,
                    "verified": distance <= self.threshold,
                })
            })
            .collect();

        Ok(serde_json::json!({
            "matches": matches,
            "searched": searched,
            "model": MODEL_NAME,
        }))
    }
}

/// Decode an image into a normalized grayscale thumbnail embedding.
fn embed(path: &Path) -> Result<Vec<f32>, String> {
    let decoded = image::open(path)
        .map_err(|e| format!("Could not read image '{}': {e}", path.display()))?;
    let thumb = decoded
        .resize_exact(THUMB, THUMB, FilterType::Triangle)
        .to_luma8();
    Ok(thumb.pixels().map(|p| p.0[0] as f32 / 255.0).collect())
}

/// Root-mean-square distance between two embeddings, in `0.0..=1.0`.
fn distance(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let sum: f32 = a
        .iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum();
    (sum / a.len() as f32).sqrt()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
