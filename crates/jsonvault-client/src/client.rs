//! HTTP client implementation for the jsonvault REST API.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("request error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The base URL did not parse.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The server answered with a failure envelope.
    #[error("server reported failure: {0}")]
    Api(String),

    /// The response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    data: serde_json::Value,
}

/// One version record as returned by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionRecord {
    pub id: i64,
    pub path: String,
    pub text: String,
    pub added: DateTime<Utc>,
}

/// Client for the jsonvault REST API.
///
/// Document paths are given with a leading slash, e.g. `/config/app`;
/// the client prepends the `/api` prefix.
pub struct VaultClient {
    http: Client,
    base_url: Url,
}

impl VaultClient {
    /// Create a client with default timeouts (5 s connect, 10 s request).
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_timeouts(base_url, Duration::from_secs(5), Duration::from_secs(10))
    }

    /// Create a client with explicit connect and request timeouts.
    pub fn with_timeouts(
        base_url: &str,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> ClientResult<Self> {
        let http = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()?;
        let base_url = Url::parse(base_url)?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api{path}"))?)
    }

    fn parse_envelope(status: StatusCode, body: &[u8]) -> ClientResult<serde_json::Value> {
        let envelope: Envelope = match serde_json::from_slice(body) {
            Ok(envelope) => envelope,
            // A non-envelope body can only come from outside the API.
            Err(e) if status == StatusCode::OK => return Err(ClientError::Decode(e)),
            Err(_) => return Err(ClientError::Api(format!("HTTP {status}"))),
        };

        if envelope.status != "success" {
            let message = envelope
                .data
                .as_str()
                .map(str::to_owned)
                .unwrap_or_else(|| envelope.data.to_string());
            return Err(ClientError::Api(message));
        }
        Ok(envelope.data)
    }

    async fn request_json(&self, builder: reqwest::RequestBuilder) -> ClientResult<serde_json::Value> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        Self::parse_envelope(status, &body)
    }

    /// List every stored path.
    pub async fn get_paths(&self) -> ClientResult<Vec<String>> {
        let data = self.request_json(self.http.get(self.endpoint("/")?)).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Latest version records for `path` and its descendants.
    pub async fn get_versions(&self, path: &str) -> ClientResult<Vec<VersionRecord>> {
        let data = self.request_json(self.http.get(self.endpoint(path)?)).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Latest document texts for `path` and its descendants.
    pub async fn get_raw(&self, path: &str) -> ClientResult<Vec<String>> {
        let versions = self.get_versions(path).await?;
        Ok(versions.into_iter().map(|v| v.text).collect())
    }

    /// Deserialize the latest documents under `path` as one JSON array.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let texts = self.get_raw(path).await?;
        let whole = format!("[{}]", texts.join(","));
        Ok(serde_json::from_str(&whole)?)
    }

    /// Store a raw JSON document at `path`.
    pub async fn put_raw(&self, path: &str, json: &str) -> ClientResult<()> {
        let builder = self
            .http
            .put(self.endpoint(path)?)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(json.to_owned());
        self.request_json(builder).await?;
        Ok(())
    }

    /// Serialize `data` and store it at `path`.
    pub async fn put<T: Serialize>(&self, path: &str, data: &T) -> ClientResult<()> {
        self.put_raw(path, &serde_json::to_string(data)?).await
    }

    /// Delete `path` and every descendant.
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.request_json(self.http.delete(self.endpoint(path)?))
            .await?;
        Ok(())
    }
}
