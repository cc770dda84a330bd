//! Per-connection request servicing.

use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::StatusCode;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use crate::cache::{CachedEntry, ResponseCache};
use crate::proxy::response;
use crate::upstream::UpstreamClient;

/// Services one accepted connection end to end, then closes it.
pub struct RequestHandler {
    cache: Arc<ResponseCache>,
    upstream: Arc<UpstreamClient>,
}

impl RequestHandler {
    pub fn new(cache: Arc<ResponseCache>, upstream: Arc<UpstreamClient>) -> Self {
        Self { cache, upstream }
    }

    /// Handle one connection. Every exit path closes the stream, and
    /// no error escapes the worker task.
    pub async fn handle(&self, stream: TcpStream, peer: SocketAddr) {
        let (read_half, mut write_half) = stream.into_split();

        if let Err(error) = self.service(read_half, &mut write_half).await {
            tracing::warn!(peer = %peer, error = %error, "Error handling request");
        }

        let _ = write_half.shutdown().await;
    }

    async fn service(
        &self,
        read_half: OwnedReadHalf,
        writer: &mut OwnedWriteHalf,
    ) -> std::io::Result<()> {
        let request_lines = read_request_head(read_half).await?;

        let Some(first_line) = request_lines.first() else {
            tracing::warn!("Empty request received");
            return response::write_status(writer, StatusCode::BAD_REQUEST).await;
        };

        let Some((method, target)) = parse_request_line(first_line) else {
            tracing::warn!(line = %first_line, "Invalid request line");
            return response::write_status(writer, StatusCode::BAD_REQUEST).await;
        };

        if !method.eq_ignore_ascii_case("GET") {
            tracing::debug!(method = %method, "Unsupported method");
            return response::write_status(writer, StatusCode::NOT_IMPLEMENTED).await;
        }

        self.serve_get(writer, target).await
    }

    async fn serve_get(&self, writer: &mut OwnedWriteHalf, target: &str) -> std::io::Result<()> {
        if let Some(entry) = self.cache.get(target) {
            tracing::info!(target = %target, "Cache hit");
            writer.write_all(entry.head.as_bytes()).await?;
            writer.write_all(&entry.body).await?;
            return writer.flush().await;
        }

        tracing::info!(target = %target, "Cache miss");
        let fetched = match self.upstream.fetch(target).await {
            Ok(fetched) => fetched,
            Err(error) => {
                // Transport-level failure: close without a response.
                tracing::warn!(target = %target, error = %error, "Origin fetch failed");
                return Ok(());
            }
        };

        let head = response::assemble_head(fetched.status, &fetched.headers, fetched.body.len());

        // Origin statuses are proxied verbatim, but only successful
        // responses populate the cache.
        if fetched.status == StatusCode::OK {
            self.cache.put(
                target.to_string(),
                CachedEntry::new(head.clone(), fetched.body.clone()),
            );
        }

        writer.write_all(head.as_bytes()).await?;
        writer.write_all(&fetched.body).await?;
        writer.flush().await
    }
}

/// Read CRLF-terminated lines up to the blank line ending the header
/// block, or to end of stream. A request body is never read.
async fn read_request_head(read_half: OwnedReadHalf) -> std::io::Result<Vec<String>> {
    let mut reader = BufReader::new(read_half);
    let mut lines = Vec::new();
    let mut line = String::new();

    loop {
        line.clear();
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            break;
        }
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            break;
        }
        lines.push(trimmed.to_string());
    }

    Ok(lines)
}

/// Split a request line into method and target; `None` if it has
/// fewer than two tokens.
fn parse_request_line(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split_whitespace();
    let method = parts.next()?;
    let target = parts.next()?;
    Some((method, target))
}
