//! Route definitions, grouped by resource.
//!
//! The API is mounted at the root level: recognition and comparison
//! submissions plus the status query, with a health check alongside.

pub mod compare;
pub mod health;
pub mod recognize;
pub mod result;

use axum::Router;

use crate::state::AppState;

/// All API routes, merged into one router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(recognize::router())
        .merge(compare::router())
        .merge(result::router())
}
