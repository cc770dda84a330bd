//! Connection dispatch: the accept loop.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, Semaphore};

use crate::limiter::RateLimiter;
use crate::net::{Listener, ListenerError};
use crate::proxy::handler::RequestHandler;
use crate::proxy::response;

/// The accept loop.
///
/// Admitted connections take a permit from a fixed-size worker pool
/// and run the handler as their own task; rejected connections get a
/// 429 written directly by the dispatcher. The loop runs until the
/// shutdown signal fires, then drains in-flight workers for at most
/// the grace period.
pub struct Dispatcher {
    limiter: Arc<dyn RateLimiter>,
    handler: Arc<RequestHandler>,
    workers: Arc<Semaphore>,
    worker_count: usize,
    shutdown_grace: Duration,
}

impl Dispatcher {
    pub fn new(
        limiter: Arc<dyn RateLimiter>,
        handler: Arc<RequestHandler>,
        workers: usize,
        shutdown_grace: Duration,
    ) -> Self {
        Self {
            limiter,
            handler,
            workers: Arc::new(Semaphore::new(workers)),
            worker_count: workers,
            shutdown_grace,
        }
    }

    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ListenerError> {
        loop {
            let accepted = tokio::select! {
                accepted = listener.accept() => accepted,
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, no longer accepting connections");
                    break;
                }
            };

            let (stream, peer) = match accepted {
                Ok(accepted) => accepted,
                Err(ListenerError::Accept(ref error)) if is_transient(error) => {
                    tracing::warn!(error = %error, "Transient accept failure");
                    continue;
                }
                Err(error) => {
                    tracing::error!(error = %error, "Listener failed");
                    return Err(error);
                }
            };

            tracing::debug!(peer = %peer, "Connection accepted");
            if !self.limiter.allow_request() {
                tracing::info!(peer = %peer, "Request limit reached, rejecting connection");
                reject(stream).await;
                continue;
            }

            tracing::debug!(peer = %peer, "Connection admitted");
            let permit = self
                .workers
                .clone()
                .acquire_owned()
                .await
                .expect("worker semaphore closed");
            let handler = self.handler.clone();
            tokio::spawn(async move {
                handler.handle(stream, peer).await;
                drop(permit);
            });
        }

        self.drain().await;
        Ok(())
    }

    /// Wait for in-flight workers by reacquiring every permit, bounded
    /// by the grace period.
    async fn drain(&self) {
        let all = self.worker_count as u32;
        match tokio::time::timeout(
            self.shutdown_grace,
            self.workers.clone().acquire_many_owned(all),
        )
        .await
        {
            Ok(Ok(_permits)) => tracing::info!("All workers drained"),
            Ok(Err(_)) => {}
            Err(_) => tracing::warn!(
                grace_secs = self.shutdown_grace.as_secs(),
                "Grace period expired with workers still active"
            ),
        }
    }
}

/// Accept errors that reflect a single doomed connection rather than
/// a broken listening socket.
fn is_transient(error: &std::io::Error) -> bool {
    matches!(
        error.kind(),
        std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::Interrupted
    )
}

/// Write the rate-limit response on the dispatcher task and close.
async fn reject(mut stream: TcpStream) {
    if let Err(error) = response::write_status(&mut stream, StatusCode::TOO_MANY_REQUESTS).await {
        tracing::debug!(error = %error, "Failed to write rate limit response");
    }
    let _ = stream.shutdown().await;
}
