//! Admission control subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher accepts connection
//!     → RateLimiter::allow_request()
//!         - fixed_window.rs (count per fixed-length window)
//!         - token_bucket.rs (continuous refill, one token per request)
//!     → admit (hand to worker pool) or reject (429)
//! ```
//!
//! # Design Decisions
//! - One capability trait; the strategy is chosen once at startup
//! - Limiters are connection-agnostic: no per-client identity
//! - Interior mutex keeps `allow_request` callable from any task

pub mod fixed_window;
pub mod token_bucket;

pub use fixed_window::FixedWindowCounter;
pub use token_bucket::TokenBucket;

use std::sync::Arc;
use std::time::Duration;

use crate::config::RateLimitConfig;

/// Admission policy consulted once per accepted connection.
///
/// Implementations mutate internal counters on the admission path and
/// must be safe to call concurrently.
pub trait RateLimiter: Send + Sync {
    /// Decide whether to admit one more request right now.
    fn allow_request(&self) -> bool;
}

/// Build the configured strategy.
pub fn from_config(config: &RateLimitConfig) -> Arc<dyn RateLimiter> {
    match config {
        RateLimitConfig::FixedWindow {
            window_secs,
            max_requests,
        } => Arc::new(FixedWindowCounter::new(
            Duration::from_secs(*window_secs),
            *max_requests,
        )),
        RateLimitConfig::TokenBucket { capacity, fill_rate } => {
            Arc::new(TokenBucket::new(*capacity as f64, *fill_rate))
        }
    }
}
