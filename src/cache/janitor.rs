//! Background expiry sweeps for the response cache.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::cache::ResponseCache;

/// Periodic task that removes expired entries from the shared cache.
///
/// One sweep per interval tick; a sweep never ends the task. Only the
/// shutdown signal does.
pub struct Janitor {
    cache: Arc<ResponseCache>,
    interval: Duration,
}

impl Janitor {
    pub fn new(cache: Arc<ResponseCache>, interval: Duration) -> Self {
        Self { cache, interval }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        let mut ticker = tokio::time::interval(self.interval);
        // The first tick completes immediately; consume it so sweeps
        // happen one full interval apart.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = self.cache.sweep_expired();
                    tracing::info!(removed, "Expired cache entries flushed");
                }
                _ = shutdown.recv() => {
                    tracing::debug!("Janitor stopping");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CachedEntry;
    use crate::lifecycle::Shutdown;
    use bytes::Bytes;

    #[tokio::test]
    async fn sweeps_expired_entries_and_stops_on_shutdown() {
        let cache = Arc::new(ResponseCache::new(4, Duration::from_millis(20)));
        cache.put(
            "/a".to_string(),
            CachedEntry::new("HTTP/1.1 200 OK\r\n\r\n".to_string(), Bytes::from_static(b"x")),
        );

        let shutdown = Shutdown::new();
        let janitor = Janitor::new(cache.clone(), Duration::from_millis(25));
        let task = tokio::spawn(janitor.run(shutdown.subscribe()));

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(cache.get("/a").is_none());

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("janitor should stop on shutdown")
            .unwrap();
    }
}
