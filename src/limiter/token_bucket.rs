//! Token bucket strategy.

use std::sync::Mutex;
use std::time::Instant;

use crate::limiter::RateLimiter;

/// Accrues permits continuously at `fill_rate` tokens per second, up
/// to `capacity`; each admitted request consumes one whole token.
///
/// The token count is fractional internally so slow fill rates still
/// make progress between calls, and it stays within
/// `0.0..=capacity` at all times.
pub struct TokenBucket {
    capacity: f64,
    fill_rate: f64,
    state: Mutex<BucketState>,
}

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a bucket that starts full.
    pub fn new(capacity: f64, fill_rate: f64) -> Self {
        Self {
            capacity,
            fill_rate,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    fn allow_at(&self, now: Instant) -> bool {
        let mut state = self.state.lock().expect("limiter mutex poisoned");

        let elapsed = now.duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.fill_rate).min(self.capacity);
        state.last_refill = now;

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

impl RateLimiter for TokenBucket {
    fn allow_request(&self) -> bool {
        self.allow_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn drains_the_initial_capacity_then_rejects() {
        let bucket = TokenBucket::new(5.0, 1.0);
        let now = Instant::now();

        for _ in 0..5 {
            assert!(bucket.allow_at(now));
        }
        assert!(!bucket.allow_at(now));
    }

    #[test]
    fn refills_at_the_configured_rate() {
        let bucket = TokenBucket::new(5.0, 1.0);
        let now = Instant::now();
        for _ in 0..5 {
            assert!(bucket.allow_at(now));
        }
        assert!(!bucket.allow_at(now));

        // Two seconds buys exactly two more admissions.
        let later = now + Duration::from_secs(2);
        assert!(bucket.allow_at(later));
        assert!(bucket.allow_at(later));
        assert!(!bucket.allow_at(later));
    }

    #[test]
    fn refill_is_capped_at_capacity() {
        let bucket = TokenBucket::new(2.0, 10.0);
        let now = Instant::now();

        let much_later = now + Duration::from_secs(60);
        assert!(bucket.allow_at(much_later));
        assert!(bucket.allow_at(much_later));
        assert!(!bucket.allow_at(much_later));
    }

    #[test]
    fn fractional_tokens_do_not_admit() {
        let bucket = TokenBucket::new(1.0, 0.5);
        let now = Instant::now();

        assert!(bucket.allow_at(now));
        // One second at half a token per second leaves 0.5 tokens.
        assert!(!bucket.allow_at(now + Duration::from_secs(1)));
        assert!(bucket.allow_at(now + Duration::from_secs(2)));
    }
}
