//! Raw HTTP/1.1 response assembly.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Headers that describe the connection or transfer framing rather
/// than the entity. The origin client already decoded the transfer,
/// so forwarding these would corrupt framing for the client.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Build a response head from an origin status and header map.
///
/// Entity headers are forwarded; framing headers are replaced with a
/// recomputed `Content-Length` and `Connection: close`.
pub fn assemble_head(status: StatusCode, headers: &HeaderMap, body_len: usize) -> String {
    let mut head = format!(
        "HTTP/1.1 {} {}\r\n",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    );

    for (name, value) in headers {
        let name = name.as_str();
        if name == "content-length" || HOP_BY_HOP.contains(&name) {
            continue;
        }
        // Header values are not guaranteed to be visible ASCII.
        if let Ok(value) = value.to_str() {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
    }

    head.push_str(&format!("Content-Length: {}\r\n", body_len));
    head.push_str("Connection: close\r\n\r\n");
    head
}

/// Write a headers-only status response (400, 429, 501).
pub async fn write_status<W>(writer: &mut W, status: StatusCode) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    );
    writer.write_all(head.as_bytes()).await?;
    writer.flush().await
}
