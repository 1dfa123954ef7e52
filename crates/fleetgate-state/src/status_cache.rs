//! Memoization of the upstream route-status fetch.
//!
//! Refresh policy is flush-and-refill: a successful refresh drops the
//! whole cache, every variant, and stores only the new snapshot. A
//! refresh for "latest" therefore evicts a still-valid snapshot for
//! "v1". Do not narrow this to per-variant eviction without a product
//! decision; operators rely on the observable behavior.
//!
//! There is no single-flight guard: concurrent refreshes for the same
//! variant may both hit the upstream, and the last writer wins.

use std::future::Future;

use fleetgate_core::{ApiVariant, RouteStatus, StatusSnapshot, Timestamp};

use crate::error::{StateError, StateResult};
use crate::store::{EphemeralStore, Ttl};

/// Default passive-expiry horizon for cached snapshots. Even without
/// an explicit refresh, stale data stops being served after a minute.
pub const DEFAULT_STATUS_TTL_SECS: u64 = 60;

pub struct StatusCache {
    store: EphemeralStore<StatusSnapshot>,
}

impl StatusCache {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            store: EphemeralStore::new(ttl_secs),
        }
    }

    /// Current snapshot for a variant, if one is cached and unexpired.
    pub fn lookup(&self, variant: &ApiVariant) -> StateResult<Option<StatusSnapshot>> {
        self.store.get(variant.as_str())
    }

    /// Fetch fresh routes for `variant` and replace the cache contents.
    ///
    /// On success the entire cache is flushed and only the new snapshot
    /// remains. On failure the error propagates and prior cached data
    /// is left untouched.
    pub async fn refresh<F, Fut, E>(
        &self,
        variant: ApiVariant,
        fetch: F,
    ) -> Result<StatusSnapshot, E>
    where
        F: FnOnce(ApiVariant) -> Fut,
        Fut: Future<Output = Result<Vec<RouteStatus>, E>>,
        E: From<StateError>,
    {
        let routes = fetch(variant.clone()).await?;
        let snapshot = StatusSnapshot::new(variant, routes);

        self.store.flush()?;
        self.store
            .set(snapshot.variant.as_str(), snapshot.clone(), Ttl::Default)?;
        Ok(snapshot)
    }

    /// Sweep body for the background timer.
    pub fn purge_expired(&self) -> StateResult<usize> {
        self.store.purge_expired(Timestamp::now())
    }

    /// Variants currently cached (for monitoring).
    pub fn cached_count(&self) -> StateResult<usize> {
        self.store.active_len()
    }
}

impl Default for StatusCache {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS_TTL_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetgate_core::RouteHealth;

    fn routes(n: usize) -> Vec<RouteStatus> {
        (0..n)
            .map(|i| RouteStatus {
                method: "get".into(),
                route: format!("/route/{i}/"),
                status: RouteHealth::Green,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_lookup_empty_cache_is_none() {
        let cache = StatusCache::default();
        assert_eq!(cache.lookup(&ApiVariant::new("latest")).unwrap(), None);
    }

    #[tokio::test]
    async fn test_refresh_then_lookup() {
        let cache = StatusCache::default();
        let snap = cache
            .refresh(ApiVariant::new("latest"), |_| async {
                Ok::<_, StateError>(routes(3))
            })
            .await
            .unwrap();
        assert_eq!(snap.routes.len(), 3);

        let cached = cache.lookup(&ApiVariant::new("latest")).unwrap().unwrap();
        assert_eq!(cached, snap);
    }

    #[tokio::test]
    async fn test_refresh_flushes_every_variant() {
        let cache = StatusCache::default();
        cache
            .refresh(ApiVariant::new("v2"), |_| async {
                Ok::<_, StateError>(routes(2))
            })
            .await
            .unwrap();
        assert!(cache.lookup(&ApiVariant::new("v2")).unwrap().is_some());

        // refreshing "v1" evicts the still-valid "v2" snapshot
        cache
            .refresh(ApiVariant::new("v1"), |_| async {
                Ok::<_, StateError>(routes(1))
            })
            .await
            .unwrap();
        assert_eq!(cache.lookup(&ApiVariant::new("v2")).unwrap(), None);
        assert!(cache.lookup(&ApiVariant::new("v1")).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_failed_refresh_leaves_prior_data_intact() {
        let cache = StatusCache::default();
        cache
            .refresh(ApiVariant::new("latest"), |_| async {
                Ok::<_, StateError>(routes(2))
            })
            .await
            .unwrap();

        let result = cache
            .refresh(ApiVariant::new("latest"), |_| async {
                Err::<Vec<RouteStatus>, _>(StateError::InternalError)
            })
            .await;
        assert!(result.is_err());
        assert!(cache.lookup(&ApiVariant::new("latest")).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_passive_expiry() {
        let cache = StatusCache::new(0);
        cache
            .refresh(ApiVariant::new("latest"), |_| async {
                Ok::<_, StateError>(routes(1))
            })
            .await
            .unwrap();
        assert_eq!(cache.lookup(&ApiVariant::new("latest")).unwrap(), None);
    }

    #[tokio::test]
    async fn test_fetch_receives_the_variant() {
        let cache = StatusCache::default();
        cache
            .refresh(ApiVariant::new("v3"), |variant| async move {
                assert_eq!(variant.as_str(), "v3");
                Ok::<_, StateError>(routes(1))
            })
            .await
            .unwrap();
    }
}
