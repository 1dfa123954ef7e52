//! Fleetgate Core
//!
//! Shared types for the Fleetgate gateway: timestamps, the upstream
//! status data model (server status, per-route health), and the
//! rendering helpers that both the cache layer and the chat layer
//! agree on.
//!
//! This crate is deliberately dependency-light; everything stateful
//! lives in `fleetgate-state`, everything Slack-specific in
//! `fleetgate-slack`.

pub mod types;

pub use types::{
    format_esi_time, format_run_time, ApiVariant, RouteHealth, RouteStatus, ServerStatus,
    StatusSnapshot, Timestamp, ESI_TIME_LAYOUT,
};
