use std::sync::Arc;

use facebytes_engine::JobEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Job lifecycle engine (owns the database pool and worker pool).
    pub engine: Arc<JobEngine>,
    /// Server configuration (spool directory, limits).
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Database connection pool, borrowed from the engine.
    pub fn pool(&self) -> &facebytes_db::DbPool {
        self.engine.pool()
    }
}
