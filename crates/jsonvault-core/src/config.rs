//! Server configuration read from the environment.

use std::time::Duration;

const DEFAULT_PORT: u16 = 8032;
const DEFAULT_MAX_VERSIONS: i64 = 10;
const DEFAULT_REPLACE_INTERVAL_SECS: i64 = 86_400;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;

/// Configuration for the server binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to listen on.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Database file path. Parent directories are created on startup.
    pub db_path: String,
    /// Maximum retained versions per path.
    pub max_versions: i64,
    /// Writes to the same path within this window replace the previous one.
    pub replace_interval_secs: i64,
    /// Per-request timeout applied by the HTTP layer.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            db_path: "jsonvault.sqlite3".to_string(),
            max_versions: DEFAULT_MAX_VERSIONS,
            replace_interval_secs: DEFAULT_REPLACE_INTERVAL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    /// Create config from environment variables.
    ///
    /// Reads:
    /// - `JSONVAULT_HOST` (default: 0.0.0.0)
    /// - `JSONVAULT_PORT` (default: 8032)
    /// - `JSONVAULT_DB_PATH` (default: jsonvault.sqlite3)
    /// - `JSONVAULT_MAX_VERSIONS` (default: 10)
    /// - `JSONVAULT_REPLACE_INTERVAL_SECS` (default: 86400)
    /// - `JSONVAULT_REQUEST_TIMEOUT_SECS` (default: 20)
    ///
    /// Values that fail to parse fall back to the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("JSONVAULT_HOST") {
            config.host = host;
        }

        if let Ok(port) = std::env::var("JSONVAULT_PORT") {
            if let Ok(port) = port.parse() {
                config.port = port;
            }
        }

        if let Ok(path) = std::env::var("JSONVAULT_DB_PATH") {
            config.db_path = path;
        }

        if let Ok(max) = std::env::var("JSONVAULT_MAX_VERSIONS") {
            if let Ok(max) = max.parse() {
                config.max_versions = max;
            }
        }

        if let Ok(secs) = std::env::var("JSONVAULT_REPLACE_INTERVAL_SECS") {
            if let Ok(secs) = secs.parse() {
                config.replace_interval_secs = secs;
            }
        }

        if let Ok(secs) = std::env::var("JSONVAULT_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.request_timeout_secs = secs;
            }
        }

        config
    }

    /// Listen address in `host:port` form.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Replace-collapse window as a chrono duration for the store.
    pub fn replace_interval(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.replace_interval_secs)
    }

    /// Request timeout for the HTTP middleware stack.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
