//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Start a programmable mock origin on an ephemeral port.
///
/// Counts the HTTP requests it serves; each response carries
/// `Connection: close` so the proxy's client reconnects per fetch.
/// Returns the origin's address and the request counter.
pub async fn start_programmable_origin<F, Fut>(f: F) -> (SocketAddr, Arc<AtomicU32>)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let counter = counter.clone();
                    tokio::spawn(async move {
                        read_request_head(&mut socket).await;
                        counter.fetch_add(1, Ordering::SeqCst);

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, calls)
}

/// Start a mock origin that returns a fixed 200 body.
#[allow(dead_code)]
pub async fn start_mock_origin(body: &'static str) -> (SocketAddr, Arc<AtomicU32>) {
    start_programmable_origin(move || async move { (200, body.to_string()) }).await
}

/// Send raw bytes to the proxy and collect the complete response.
///
/// The write side is shut down after the request so handlers waiting
/// on more input see end-of-stream.
#[allow(dead_code)]
pub async fn send_raw(addr: SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();
    stream.shutdown().await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

/// Consume one request head so the counter reflects served requests,
/// not accepted sockets.
async fn read_request_head(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut byte = [0u8; 1];
    while !buf.ends_with(b"\r\n\r\n") {
        match socket.read(&mut byte).await {
            Ok(0) | Err(_) => break,
            Ok(_) => buf.push(byte[0]),
        }
    }
}
