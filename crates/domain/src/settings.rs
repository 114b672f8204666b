//! Client Settings Domain Model
//!
//! Tunables of the request engine. Every field has a default so a partial
//! settings file is always valid.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Largest response body buffered in memory (50 MiB).
pub const DEFAULT_MAX_BUFFER_BYTES: u64 = 50 * 1024 * 1024;

/// Body size above which decoding moves to a worker thread (256 KiB).
pub const DEFAULT_OFFLOAD_THRESHOLD_BYTES: usize = 256 * 1024;

/// Request timeout when none is given (60 s).
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Settings of the request engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Ceiling for buffered (non-streamed) response bodies.
    #[serde(default = "default_max_buffer_bytes")]
    pub max_buffer_bytes: u64,

    /// Bodies larger than this are classified on a worker thread.
    #[serde(default = "default_offload_threshold")]
    pub offload_threshold_bytes: usize,

    /// User-Agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum redirects followed; 0 disables redirects.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

const fn default_max_buffer_bytes() -> u64 {
    DEFAULT_MAX_BUFFER_BYTES
}

const fn default_offload_threshold() -> usize {
    DEFAULT_OFFLOAD_THRESHOLD_BYTES
}

fn default_user_agent() -> String {
    concat!("Courier/", env!("CARGO_PKG_VERSION")).to_string()
}

const fn default_max_redirects() -> usize {
    10
}

impl ClientSettings {
    /// Returns the timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_buffer_bytes: default_max_buffer_bytes(),
            offload_threshold_bytes: default_offload_threshold(),
            user_agent: default_user_agent(),
            max_redirects: default_max_redirects(),
        }
    }
}
