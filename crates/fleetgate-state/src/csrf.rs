//! One-time CSRF state tokens for the OAuth authorization-redirect flow.
//!
//! A token is issued, embedded as the `state` parameter of the
//! outbound authorize URL, and redeemed exactly once when the callback
//! comes back. Redeem-then-delete happens in a single lock
//! acquisition, so a leaked callback URL cannot be replayed.

use rand::RngCore;

use crate::error::{StateError, StateResult};
use crate::store::{EphemeralStore, Ttl};

/// Bytes of entropy per token; hex-encoded to twice this many chars.
const STATE_TOKEN_BYTES: usize = 16;

/// Default token lifetime: five minutes.
pub const DEFAULT_STATE_TTL_SECS: u64 = 300;

/// Issues and redeems single-use CSRF state tokens.
pub struct CsrfStateManager {
    store: EphemeralStore<()>,
    ttl_secs: u64,
}

impl CsrfStateManager {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            store: EphemeralStore::new(ttl_secs),
            ttl_secs,
        }
    }

    /// Generate a fresh opaque token and register it with the fixed TTL.
    pub fn issue(&self) -> StateResult<String> {
        let mut bytes = [0u8; STATE_TOKEN_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        let token = hex::encode(bytes);
        self.store
            .set(token.clone(), (), Ttl::Seconds(self.ttl_secs))?;
        Ok(token)
    }

    /// Consume a token. Succeeds at most once per issued token;
    /// never-issued, already-redeemed, and expired tokens all fail the
    /// same way.
    pub fn redeem(&self, token: &str) -> StateResult<()> {
        match self.store.take(token)? {
            Some(()) => Ok(()),
            None => Err(StateError::StateNotFound),
        }
    }

    /// Sweep body for the background timer.
    pub fn purge_expired(&self) -> StateResult<usize> {
        self.store.purge_expired(fleetgate_core::Timestamp::now())
    }

    /// Tokens currently outstanding (for monitoring).
    pub fn pending_count(&self) -> StateResult<usize> {
        self.store.active_len()
    }
}

impl Default for CsrfStateManager {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_TTL_SECS)
    }
}
