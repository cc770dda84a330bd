//! Request-handling pipeline.
//!
//! # Data Flow
//! ```text
//! Listener accepts connection
//!     → dispatcher.rs (rate limiter gate)
//!         - reject → 429 written inline, no worker consumed
//!         - admit  → worker permit + spawned handler task
//!     → handler.rs (parse request line, validate)
//!         - cache hit  → stored response written verbatim
//!         - cache miss → origin fetch → cache populate → respond
//!     → connection closed (no keep-alive)
//! ```
//!
//! # Design Decisions
//! - One request per connection; every exit path closes it
//! - The worker pool is a semaphore: rejected connections never hold
//!   a permit, and the dispatcher only ever waits for a free slot
//! - Errors are contained per connection and never cross handlers

pub mod dispatcher;
pub mod handler;
pub mod response;

pub use dispatcher::Dispatcher;
pub use handler::RequestHandler;
