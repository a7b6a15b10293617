//! Job identifiers, lifecycle states, and the queued descriptor.
//!
//! A job's externally visible lifecycle is `PENDING -> RUNNING ->
//! {SUCCESS | FAILURE}`. Transitions are monotonic: once a job reaches a
//! terminal state its record never changes again. The state names mirror
//! the strings persisted in the `jobs` table.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::work::WorkInput;

// ---------------------------------------------------------------------------
// JobId
// ---------------------------------------------------------------------------

/// Opaque unique handle for a submitted job.
///
/// Generated once at submission time (UUIDv4) and immutable afterwards.
/// This is the only identifier clients ever see.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct JobId(String);

impl JobId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        JobId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        JobId(value)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        JobId(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// JobState
// ---------------------------------------------------------------------------

/// Lifecycle state of a job record.
///
/// Persisted as upper-case TEXT (`PENDING`, `RUNNING`, `SUCCESS`,
/// `FAILURE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum JobState {
    Pending,
    Running,
    Success,
    Failure,
}

impl JobState {
    /// Terminal states never change once reached.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Success | JobState::Failure)
    }

    /// Position in the lifecycle ordering. Observed state sequences for a
    /// single job must be non-decreasing in this rank.
    pub fn rank(self) -> u8 {
        match self {
            JobState::Pending => 0,
            JobState::Running => 1,
            JobState::Success | JobState::Failure => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Pending => "PENDING",
            JobState::Running => "RUNNING",
            JobState::Success => "SUCCESS",
            JobState::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// JobDescriptor
// ---------------------------------------------------------------------------

/// The queued representation of a job, distinct from its persisted record.
///
/// Created by the submission coordinator after the PENDING record exists,
/// consumed by exactly one worker, and never mutated after enqueue.
#[derive(Debug, Clone)]
pub struct JobDescriptor {
    pub id: JobId,
    pub input: WorkInput,
}

impl JobDescriptor {
    pub fn new(id: JobId, input: WorkInput) -> Self {
        JobDescriptor { id, input }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
