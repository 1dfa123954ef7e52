use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Timestamp — canonical time representation (seconds + nanoseconds)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds_since_epoch: u64,
    pub nanoseconds: u32,
}

impl Timestamp {
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            seconds_since_epoch: now.timestamp() as u64,
            nanoseconds: now.timestamp_subsec_nanos(),
        }
    }

    pub fn from_seconds(seconds: u64) -> Self {
        Self {
            seconds_since_epoch: seconds,
            nanoseconds: 0,
        }
    }

    /// This timestamp shifted forward by `seconds`.
    pub fn plus_seconds(&self, seconds: u64) -> Self {
        Self {
            seconds_since_epoch: self.seconds_since_epoch + seconds,
            nanoseconds: self.nanoseconds,
        }
    }

    pub fn to_rfc3339(&self) -> String {
        let dt = DateTime::from_timestamp(self.seconds_since_epoch as i64, self.nanoseconds);
        dt.map(|d| d.to_rfc3339())
            .unwrap_or_else(|| "invalid".to_string())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self {
            seconds_since_epoch: dt.timestamp() as u64,
            nanoseconds: dt.timestamp_subsec_nanos(),
        }
    }
}

// ---------------------------------------------------------------------------
// ApiVariant — cache partition key for the upstream status API
// ---------------------------------------------------------------------------

/// A named axis of the upstream status API (e.g. "latest", "v1").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApiVariant(pub String);

impl ApiVariant {
    pub fn new(variant: impl Into<String>) -> Self {
        Self(variant.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ApiVariant {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// RouteHealth / RouteStatus — per-route health from the upstream status API
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteHealth {
    Green,
    Yellow,
    Red,
}

impl RouteHealth {
    /// Title-cased name used in chat summaries ("Red", "Yellow").
    pub fn title(&self) -> &'static str {
        match self {
            RouteHealth::Green => "Green",
            RouteHealth::Yellow => "Yellow",
            RouteHealth::Red => "Red",
        }
    }
}

impl fmt::Display for RouteHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteHealth::Green => write!(f, "green"),
            RouteHealth::Yellow => write!(f, "yellow"),
            RouteHealth::Red => write!(f, "red"),
        }
    }
}

/// One route's health as reported by the upstream status endpoint.
/// Unknown fields in the upstream payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStatus {
    pub method: String,
    pub route: String,
    pub status: RouteHealth,
}

// ---------------------------------------------------------------------------
// StatusSnapshot — one successful upstream fetch, replaced wholesale
// ---------------------------------------------------------------------------

/// The result of one successful route-status fetch. Snapshots are
/// immutable once created; a refresh replaces the whole value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub variant: ApiVariant,
    pub routes: Vec<RouteStatus>,
    pub fetched_at: Timestamp,
}

impl StatusSnapshot {
    pub fn new(variant: ApiVariant, routes: Vec<RouteStatus>) -> Self {
        Self {
            variant,
            routes,
            fetched_at: Timestamp::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// ServerStatus — the upstream game-server status payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerStatus {
    pub players: u64,
    #[serde(default)]
    pub server_version: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub vip: bool,
}

/// Timestamp layout the upstream documents for its payloads. Used when
/// rendering times back out in chat messages.
pub const ESI_TIME_LAYOUT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Render a timestamp in the upstream's documented layout.
pub fn format_esi_time(dt: &DateTime<Utc>) -> String {
    dt.format(ESI_TIME_LAYOUT).to_string()
}

/// Render "running for" as `HHh MMm SSs`.
///
/// Hours are taken modulo 24, so uptimes of a day or more wrap instead
/// of accumulating days. Kept as-is.
pub fn format_run_time(start: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - start).num_seconds().max(0);
    format!(
        "{:02}h {:02}m {:02}s",
        (secs / 3600) % 24,
        (secs / 60) % 60,
        secs % 60
    )
}
