//! Fixed window counter strategy.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::limiter::RateLimiter;

/// Counts admissions within a fixed-length window.
///
/// The window rolls over lazily on the first call after it elapses;
/// nothing runs on a timer. Bursts straddling a window boundary can
/// admit up to twice the per-window maximum, which is inherent to
/// fixed windows.
pub struct FixedWindowCounter {
    window: Duration,
    max_requests: u64,
    state: Mutex<WindowState>,
}

struct WindowState {
    window_start: Instant,
    count: u64,
}

impl FixedWindowCounter {
    pub fn new(window: Duration, max_requests: u64) -> Self {
        Self {
            window,
            max_requests,
            state: Mutex::new(WindowState {
                window_start: Instant::now(),
                count: 0,
            }),
        }
    }

    fn allow_at(&self, now: Instant) -> bool {
        let mut state = self.state.lock().expect("limiter mutex poisoned");

        if now.duration_since(state.window_start) > self.window {
            state.window_start = now;
            state.count = 0;
        }

        if state.count >= self.max_requests {
            return false;
        }
        state.count += 1;
        true
    }
}

impl RateLimiter for FixedWindowCounter {
    fn allow_request(&self) -> bool {
        self.allow_at(Instant::now())
    }
}
