//! Route definitions for the REST API.
//!
//! Everything lives under the fixed `/api` prefix. The root (`/api/`) lists
//! known paths; any other URL under the prefix addresses a document path.

mod documents;
mod paths;

use axum::routing::get;
use axum::Router;

use crate::envelope::ApiError;
use crate::state::AppState;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/",
            get(paths::list_paths)
                .put(paths::put_root)
                .fallback(unknown_method),
        )
        .route(
            "/api/*path",
            get(documents::get_content)
                .put(documents::put_content)
                .delete(documents::delete_path)
                .fallback(unknown_method),
        )
        .with_state(state)
}

/// Any verb outside the routing table fails with the fixed message.
async fn unknown_method() -> ApiError {
    ApiError::new("unknown method")
}
