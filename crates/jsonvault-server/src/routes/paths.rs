//! Endpoints at the API root.

use axum::extract::State;
use axum::response::Response;

use crate::envelope::{success, ApiResult};
use crate::state::AppState;

/// List every stored path, lexicographically ascending.
/// GET /api/
pub async fn list_paths(State(state): State<AppState>) -> ApiResult<Response> {
    let store = state.store.read().await;
    let paths = store.get_paths()?;
    Ok(success(paths))
}

/// PUT to the API root is accepted and ignored.
/// PUT /api/
pub async fn put_root() -> Response {
    success("")
}
