//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind, accept)
//!     → Hand off to the dispatcher
//! ```
//!
//! # Design Decisions
//! - Bind failure is the only fatal listener error
//! - Accept errors are surfaced, not swallowed; the dispatcher
//!   decides whether they are transient
//! - The worker bound lives in the dispatcher, not here: rejected
//!   connections must never hold a worker slot

pub mod listener;

pub use listener::{Listener, ListenerError};
