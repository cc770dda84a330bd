//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! proxy. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the caching proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, worker pool).
    pub listener: ListenerConfig,

    /// Origin server the proxy forwards to.
    pub upstream: UpstreamConfig,

    /// Response cache settings.
    pub cache: CacheConfig,

    /// Rate limiting strategy and parameters.
    pub rate_limit: RateLimitConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Number of concurrent request-handling workers.
    pub workers: usize,

    /// How long shutdown waits for in-flight workers, in seconds.
    pub shutdown_grace_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            workers: 20,
            shutdown_grace_secs: 10,
        }
    }
}

/// Origin server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the origin all requests are forwarded to.
    pub origin: String,

    /// Total request timeout for origin fetches, in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            origin: "https://www.ifixit.com".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Response cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached responses.
    pub capacity: usize,

    /// Age past which an entry is eligible for removal, in seconds.
    pub ttl_secs: u64,

    /// How often the janitor sweeps expired entries, in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            ttl_secs: 60,
            sweep_interval_secs: 60,
        }
    }
}

/// Rate limiting strategy, selected at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum RateLimitConfig {
    /// Count admissions within a fixed-length window.
    FixedWindow {
        /// Window length in seconds.
        #[serde(default = "default_window_secs")]
        window_secs: u64,

        /// Maximum admissions per window.
        #[serde(default = "default_max_requests")]
        max_requests: u64,
    },

    /// Accrue permits continuously up to a capacity.
    TokenBucket {
        /// Maximum number of stored tokens.
        #[serde(default = "default_bucket_capacity")]
        capacity: u64,

        /// Tokens added per second.
        #[serde(default = "default_fill_rate")]
        fill_rate: f64,
    },
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        RateLimitConfig::FixedWindow {
            window_secs: default_window_secs(),
            max_requests: default_max_requests(),
        }
    }
}

fn default_window_secs() -> u64 {
    60
}

fn default_max_requests() -> u64 {
    2
}

fn default_bucket_capacity() -> u64 {
    100
}

fn default_fill_rate() -> f64 {
    10.0
}
