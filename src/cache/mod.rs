//! Response caching subsystem.
//!
//! # Data Flow
//! ```text
//! Handler GET request
//!     → store.rs get(target)
//!         - hit  → stored response served verbatim (entry marked MRU)
//!         - miss → origin fetch → put(target, entry)
//!           (insert past capacity evicts the LRU entry)
//!
//! Independently:
//!     janitor.rs wakes every sweep interval
//!     → store.rs sweep_expired() removes entries older than the TTL
//! ```
//!
//! # Design Decisions
//! - Lookups do not check the TTL; expiry is solely the janitor's job,
//!   so a not-yet-swept stale entry is still served
//! - Entries are immutable; a refresh replaces the entry
//! - One mutex guards the map; each operation takes it exactly once

pub mod janitor;
pub mod store;

pub use janitor::Janitor;
pub use store::{CachedEntry, ResponseCache};
