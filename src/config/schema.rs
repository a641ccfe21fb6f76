//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a pool.
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so minimal configs stay minimal.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for a load-balanced pool.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PoolConfig {
    /// Backend node endpoints, in priority order.
    pub endpoints: Vec<EndpointConfig>,

    /// Dispatch policy (retries, quarantine).
    pub dispatch: DispatchConfig,

    /// HTTP client settings shared by all endpoints.
    pub http: HttpConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// A single backend node endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointConfig {
    /// Unique endpoint identifier for logging/metrics.
    pub name: String,

    /// Base URL of the node (e.g., "http://127.0.0.1:8983/search").
    pub url: String,
}

/// Dispatch policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Total attempts per node per call. Must be >= 1; a value of 1 means one
    /// attempt and no retry delay.
    pub max_retries: u32,

    /// Delay in milliseconds between consecutive attempts on the same node.
    /// Only slept when another attempt on that node follows.
    pub retry_interval_ms: u64,

    /// Whether inactive nodes are ever reconsidered for dispatch.
    pub quarantine_enabled: bool,

    /// Minimum elapsed milliseconds since a node's last failure before an
    /// inactive node becomes eligible again.
    pub quarantine_period_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_retries: 1,
            retry_interval_ms: 0,
            quarantine_enabled: true,
            quarantine_period_ms: 0,
        }
    }
}

impl DispatchConfig {
    /// Retry delay as a [`Duration`].
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    /// Quarantine period as a [`Duration`].
    pub fn quarantine_period(&self) -> Duration {
        Duration::from_millis(self.quarantine_period_ms)
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in milliseconds. A timed-out request counts as a
    /// transient connection failure.
    pub request_timeout_ms: u64,

    /// Content type sent with plain `post` bodies.
    pub post_content_type: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 30_000,
            post_content_type: "application/json".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level filter when RUST_LOG is not set (e.g., "info", "searchpool=debug").
    pub log_level: String,

    /// Emit JSON-formatted logs instead of the human-readable format.
    pub log_json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}
