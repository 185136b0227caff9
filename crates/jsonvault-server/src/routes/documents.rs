//! Document endpoints: one URL per stored path.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::Response;

use jsonvault_core::VaultError;

use crate::envelope::{success, ApiResult};
use crate::state::AppState;

/// Latest version for the path and each of its descendants.
/// GET /api/<path>
pub async fn get_content(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> ApiResult<Response> {
    let store = state.store.read().await;
    let versions = store.get_content(&path, 1)?;
    Ok(success(versions))
}

/// Validate the body as JSON and store it as a new version.
/// PUT /api/<path>
pub async fn put_content(
    State(state): State<AppState>,
    Path(path): Path<String>,
    body: Bytes,
) -> ApiResult<Response> {
    // Validation happens before any lock is taken; an invalid body never
    // reaches the store.
    let text = compact_json(&body)?;

    let store = state.store.write().await;
    store.add(&path, &text)?;
    Ok(success(""))
}

/// Delete the path and its whole subtree.
/// DELETE /api/<path>
pub async fn delete_path(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> ApiResult<Response> {
    let store = state.store.write().await;
    store.delete(&path)?;
    Ok(success(""))
}

/// Parse and re-serialize so stored documents are compact, whitespace-normalized JSON.
fn compact_json(body: &[u8]) -> ApiResult<String> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| VaultError::Validation(e.to_string()))?;
    let text = serde_json::to_string(&value).map_err(|e| VaultError::Validation(e.to_string()))?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_json_normalizes_whitespace() {
        let text = compact_json(br#" { "a" : [ 1 , 2 ] } "#).unwrap();
        assert_eq!(text, r#"{"a":[1,2]}"#);
    }

    #[test]
    fn compact_json_rejects_truncated_input() {
        assert!(compact_json(br#"{"a":"b"#).is_err());
    }
}
