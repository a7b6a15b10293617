//! FaceBytes API server library.
//!
//! Exposes the core building blocks (config, state, error handling, routes,
//! upload staging) so integration tests and the binary entrypoint can both
//! access them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod staging;
pub mod state;
