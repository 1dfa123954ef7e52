//! Fleetgate: a Slack gateway for an EVE Online community.
//!
//! Two jobs:
//!
//! - Relay game-server and API health into chat on command (`!tq`,
//!   `!esi`), memoized through a short-lived snapshot cache.
//! - Gate Slack invites behind an EVE SSO login, with single-use CSRF
//!   state tokens protecting the OAuth redirect.
//!
//! This crate is the composition root: configuration, the HTTP
//! surface, the chat-command processor, and the network collaborators
//! live here; the reusable pieces live in `fleetgate-core`,
//! `fleetgate-state` and `fleetgate-slack`.

pub mod clients;
pub mod config;
pub mod error;
pub mod http;
pub mod processor;
pub mod state;

pub use clients::{
    build_http_client, ChatPoster, EsiStatusApi, EveSsoExchanger, ServerProbe, SlackWebApi,
    StatusApi, TokenExchanger,
};
pub use config::{CacheConfig, EveConfig, GateConfig, ListenConfig, SlackConfig};
pub use error::{GateError, GateResult};
pub use http::{authorize_url, build_router, AuthedIdentity};
pub use processor::{parse_command, process_message, Command};
pub use state::AppState;
