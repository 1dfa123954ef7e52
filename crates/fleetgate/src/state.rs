//! Shared application state handed to every handler.

use std::sync::Arc;

use fleetgate_state::{CsrfStateManager, StatusCache};

use crate::clients::{ChatPoster, StatusApi, TokenExchanger};
use crate::config::GateConfig;

/// Everything a request handler needs. Constructed once at startup and
/// shared behind an `Arc`; collaborators are trait objects so tests
/// can swap the network out.
pub struct AppState {
    pub config: GateConfig,
    pub csrf: CsrfStateManager,
    pub status_cache: StatusCache,
    pub chat: Arc<dyn ChatPoster>,
    pub status_api: Arc<dyn StatusApi>,
    pub token_exchanger: Arc<dyn TokenExchanger>,
}

impl AppState {
    pub fn new(
        config: GateConfig,
        chat: Arc<dyn ChatPoster>,
        status_api: Arc<dyn StatusApi>,
        token_exchanger: Arc<dyn TokenExchanger>,
    ) -> Self {
        Self {
            csrf: CsrfStateManager::new(config.cache.state_ttl_secs),
            status_cache: StatusCache::new(config.cache.status_ttl_secs),
            config,
            chat,
            status_api,
            token_exchanger,
        }
    }
}
