//! Route definitions for the `/recognize` endpoints.

use axum::routing::post;
use axum::Router;

use crate::handlers::recognize;
use crate::state::AppState;

/// Routes mounted at `/recognize`.
///
/// ```text
/// POST   /recognize        -> recognize
/// POST   /recognize/batch  -> recognize_batch
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recognize", post(recognize::recognize))
        .route("/recognize/batch", post(recognize::recognize_batch))
}
