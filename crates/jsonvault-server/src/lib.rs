//! jsonvault-server - REST API server for jsonvault.
//!
//! This crate provides the HTTP front end for the jsonvault store.
//!
//! # Example
//!
//! ```ignore
//! use jsonvault_core::Store;
//! use jsonvault_server::{create_server, AppState};
//!
//! #[tokio::main]
//! async fn main() {
//!     let state = AppState::new(Store::open("jsonvault.sqlite3").unwrap());
//!     let app = create_server(state, std::time::Duration::from_secs(20));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8032").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod envelope;
pub mod middleware;
pub mod routes;
pub mod state;

pub use envelope::{ApiError, ApiResult};
pub use state::AppState;

use std::time::Duration;

use axum::{middleware as axum_middleware, Router};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Create the server with all routes and middleware.
///
/// The middleware pipeline wraps the routed handler in order: tracing,
/// CORS, request timeout, then request logging.
pub fn create_server(state: AppState, request_timeout: Duration) -> Router {
    routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_layer())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}
