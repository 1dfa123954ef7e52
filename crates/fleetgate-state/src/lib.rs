//! Fleetgate State
//!
//! The stateful, concurrency-sensitive primitives behind the gateway:
//!
//! - [`EphemeralStore`] — a generic key→value store with per-entry
//!   expiry and a caller-driven sweep. Reads check expiry themselves;
//!   the sweep only reclaims memory.
//! - [`CsrfStateManager`] — single-use, expiring opaque tokens gating
//!   the OAuth authorization-code exchange.
//! - [`StatusCache`] — flush-and-refill memoization of the upstream
//!   route-status fetch, keyed by API variant.
//!
//! Everything here is single-process and in-memory: no persistence,
//! no distributed coordination.

pub mod csrf;
pub mod error;
pub mod status_cache;
pub mod store;

pub use csrf::CsrfStateManager;
pub use error::{StateError, StateResult};
pub use status_cache::StatusCache;
pub use store::{EphemeralStore, Ttl};
