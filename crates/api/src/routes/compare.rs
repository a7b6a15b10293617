//! Route definitions for the `/compare` endpoints.

use axum::routing::post;
use axum::Router;

use crate::handlers::compare;
use crate::state::AppState;

/// Routes mounted at `/compare`.
///
/// ```text
/// POST   /compare          -> compare
/// POST   /compare/batch    -> compare_batch
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/compare", post(compare::compare))
        .route("/compare/batch", post(compare::compare_batch))
}
