//! jsonvault-client - Client library for the jsonvault REST API.
//!
//! Pure request/response marshaling: builds requests, unwraps the
//! `{"status","data"}` envelope, and surfaces server-reported failures.
//!
//! # Example
//!
//! ```ignore
//! use jsonvault_client::VaultClient;
//!
//! let client = VaultClient::new("http://localhost:8032")?;
//! client.put("/config/app", &serde_json::json!({"debug": true})).await?;
//! let texts = client.get_raw("/config").await?;
//! ```

pub mod client;

pub use client::{ClientError, ClientResult, VaultClient, VersionRecord};
