//! The FaceBytes job lifecycle engine.
//!
//! Accepts units of work, hands them to a pool of asynchronous executors,
//! and reconciles their outcomes into durable, queryable status records:
//!
//! - [`JobEngine`]: submission coordinator and query path, the public
//!   face of the engine. Explicitly constructed and torn down; no global
//!   broker or store handles.
//! - [`queue`]: bounded multi-producer dispatch channel.
//! - [`worker`]: long-lived executor tasks invoking the work function.
//! - [`reconcile`]: idempotent terminal writes into the record store.

pub mod config;
mod engine;
pub mod error;
pub mod queue;
pub mod reconcile;
mod worker;

pub use config::EngineConfig;
pub use engine::JobEngine;
pub use error::{QueryError, SubmitError};
