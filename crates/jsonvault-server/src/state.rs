//! Shared server state.

use std::sync::Arc;

use jsonvault_core::Store;
use tokio::sync::RwLock;

/// Shared application state.
///
/// Every request worker holds the same store behind a reader/writer lock.
/// The lock discipline is part of each handler's contract: `get_paths` and
/// `get_content` take the read side (concurrent among themselves), `add` and
/// `delete` take the write side (exclusive). This serializes multi-statement
/// transactions at the application layer; the store itself additionally
/// restricts the engine to a single connection.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<Store>>,
}

impl AppState {
    /// Create application state owning the given store.
    pub fn new(store: Store) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }
}
