//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Initialize subsystems → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain workers → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then core, then the listener
//! - The dispatcher and the janitor observe the same broadcast signal
//! - The drain deadline bounds how long shutdown can take

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
