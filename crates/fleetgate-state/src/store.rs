//! Generic ephemeral key→value store with per-entry expiry.
//!
//! Reads check logical expiry on every access and never depend on the
//! sweep having run; `purge_expired` only reclaims memory. All
//! mutations happen under one Mutex so set/get/take are atomic with
//! respect to each other.

use std::collections::HashMap;
use std::sync::Mutex;

use fleetgate_core::Timestamp;

use crate::error::{StateError, StateResult};

/// How long an entry lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// Use the store's default horizon.
    Default,
    /// Explicit lifetime in seconds.
    Seconds(u64),
    /// No automatic expiry; removed only by `remove` or `flush`.
    Never,
}

struct Entry<V> {
    value: V,
    expires_at: Option<Timestamp>,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Timestamp) -> bool {
        matches!(self.expires_at, Some(deadline) if now >= deadline)
    }
}

/// Thread-safe in-memory store with per-entry expiry.
///
/// Owned by the composition root and injected where needed; there are
/// no process-global instances.
pub struct EphemeralStore<V> {
    entries: Mutex<HashMap<String, Entry<V>>>,
    default_ttl_secs: u64,
}

impl<V: Clone> EphemeralStore<V> {
    /// Create a store whose `Ttl::Default` entries live `default_ttl_secs`.
    pub fn new(default_ttl_secs: u64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_ttl_secs,
        }
    }

    /// Insert or overwrite. Overwriting replaces the whole entry,
    /// expiry included.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Ttl) -> StateResult<()> {
        let expires_at = match ttl {
            Ttl::Default => Some(Timestamp::now().plus_seconds(self.default_ttl_secs)),
            Ttl::Seconds(secs) => Some(Timestamp::now().plus_seconds(secs)),
            Ttl::Never => None,
        };

        let mut entries = self.entries.lock().map_err(|_| StateError::InternalError)?;
        entries.insert(key.into(), Entry { value, expires_at });
        Ok(())
    }

    /// Look up a key. Logically-expired entries read as absent even if
    /// the sweep has not reclaimed them yet.
    pub fn get(&self, key: &str) -> StateResult<Option<V>> {
        let now = Timestamp::now();
        let entries = self.entries.lock().map_err(|_| StateError::InternalError)?;
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone()))
    }

    /// Remove and return a key in one lock acquisition. Expired
    /// entries are dropped and read as absent.
    pub fn take(&self, key: &str) -> StateResult<Option<V>> {
        let now = Timestamp::now();
        let mut entries = self.entries.lock().map_err(|_| StateError::InternalError)?;
        match entries.remove(key) {
            Some(entry) if !entry.is_expired(now) => Ok(Some(entry.value)),
            _ => Ok(None),
        }
    }

    /// Remove a key. Idempotent.
    pub fn remove(&self, key: &str) -> StateResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StateError::InternalError)?;
        entries.remove(key);
        Ok(())
    }

    /// Drop every entry, expired or not.
    pub fn flush(&self) -> StateResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StateError::InternalError)?;
        entries.clear();
        Ok(())
    }

    /// Sweep body: reclaim expired entries. Driven on a fixed interval
    /// by the composition root; never required for correctness.
    pub fn purge_expired(&self, now: Timestamp) -> StateResult<usize> {
        let mut entries = self.entries.lock().map_err(|_| StateError::InternalError)?;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let purged = before - entries.len();
        if purged > 0 {
            tracing::debug!(purged, "swept expired entries");
        }
        Ok(purged)
    }

    /// Number of logically-live entries (for monitoring).
    pub fn active_len(&self) -> StateResult<usize> {
        let now = Timestamp::now();
        let entries = self.entries.lock().map_err(|_| StateError::InternalError)?;
        Ok(entries
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count())
    }
}
