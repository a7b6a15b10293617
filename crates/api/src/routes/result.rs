//! Route definition for the `/result/{id}` endpoint.

use axum::routing::get;
use axum::Router;

use crate::handlers::result;
use crate::state::AppState;

/// Routes mounted at `/result`.
///
/// ```text
/// GET    /result/{id}      -> get_result
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/result/{id}", get(result::get_result))
}
