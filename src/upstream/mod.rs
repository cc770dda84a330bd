//! Origin fetch subsystem.
//!
//! # Data Flow
//! ```text
//! Handler cache miss
//!     → client.rs fetch(target)
//!     → origin GET with bounded timeout
//!     → UpstreamResponse (status, headers, buffered body)
//! ```
//!
//! # Design Decisions
//! - One fixed origin; the target is joined onto its base URL
//! - Bodies are fully buffered: one response per connection, no
//!   streaming or chunked transfer
//! - Every fetch carries the configured timeout so a slow origin
//!   cannot pin a worker indefinitely

pub mod client;

pub use client::{UpstreamClient, UpstreamError, UpstreamResponse};
