//! Domain types and pure logic for the FaceBytes job engine.
//!
//! This crate holds everything the other crates agree on but that does no
//! I/O itself: job identifiers and lifecycle states, work inputs and
//! outcomes, the [`WorkFunction`] plugin trait, upload validation, and the
//! batch pairing policies.

pub mod error;
pub mod job;
pub mod pairing;
pub mod upload;
pub mod work;

pub use error::CoreError;
pub use job::{JobDescriptor, JobId, JobState};
pub use pairing::BatchPairing;
pub use work::{Outcome, WorkFunction, WorkInput};
