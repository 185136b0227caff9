//! jsonvault-core - Core library for jsonvault.
//!
//! This crate provides the versioned, path-addressed JSON document store
//! and its configuration and error types.
//!
//! # Example
//!
//! ```ignore
//! use jsonvault_core::Store;
//!
//! let store = Store::open("jsonvault.sqlite3")?;
//!
//! // Store a document version
//! store.add("/config/app", r#"{"debug":true}"#)?;
//!
//! // Latest version for the path and each descendant
//! let versions = store.get_content("/config", 1)?;
//! ```

pub mod config;
pub mod error;
pub mod store;
pub mod version;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{VaultError, VaultResult};
pub use store::Store;
pub use version::Version;
