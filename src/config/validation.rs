//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (capacities, intervals, rates)
//! - Check the origin parses as an http(s) URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::{ProxyConfig, RateLimitConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration, collecting every error found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(error(
            "listener.bind_address",
            "not a valid socket address",
        ));
    }
    if config.listener.workers == 0 {
        errors.push(error("listener.workers", "worker pool must have at least one worker"));
    }

    match Url::parse(&config.upstream.origin) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(_) => errors.push(error("upstream.origin", "scheme must be http or https")),
        Err(_) => errors.push(error("upstream.origin", "not a valid URL")),
    }
    if config.upstream.timeout_secs == 0 {
        errors.push(error("upstream.timeout_secs", "must be positive"));
    }

    if config.cache.capacity == 0 {
        errors.push(error("cache.capacity", "must hold at least one entry"));
    }
    if config.cache.ttl_secs == 0 {
        errors.push(error("cache.ttl_secs", "must be positive"));
    }
    if config.cache.sweep_interval_secs == 0 {
        errors.push(error("cache.sweep_interval_secs", "must be positive"));
    }

    match &config.rate_limit {
        RateLimitConfig::FixedWindow {
            window_secs,
            max_requests,
        } => {
            if *window_secs == 0 {
                errors.push(error("rate_limit.window_secs", "must be positive"));
            }
            if *max_requests == 0 {
                errors.push(error("rate_limit.max_requests", "must admit at least one request"));
            }
        }
        RateLimitConfig::TokenBucket { capacity, fill_rate } => {
            if *capacity == 0 {
                errors.push(error("rate_limit.capacity", "must hold at least one token"));
            }
            if !fill_rate.is_finite() || *fill_rate <= 0.0 {
                errors.push(error("rate_limit.fill_rate", "must be a positive number"));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn error(field: &str, message: &str) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message: message.to_string(),
    }
}
