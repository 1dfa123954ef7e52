//! Attachment types and the message builders the status commands use.
//!
//! Shapes follow the chat platform's attachment JSON; the gateway's
//! `ChatPoster` collaborator serializes these verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fleetgate_core::{format_esi_time, format_run_time, ServerStatus};

use crate::categorize::{render_route_lines, CategoryBucket};

/// The game server this gateway reports on. Kept as a constant so
/// other servers can be supported later.
pub const SERVER_NAME: &str = "Tranquility";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<AttachmentField>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
    #[serde(default)]
    pub short: bool,
}

/// Wrap rendered route lines in a literal code block.
pub fn routes_code_block(routes: &[fleetgate_core::RouteStatus]) -> String {
    format!("```{}```", render_route_lines(routes).join("\n"))
}

/// Summary attachment for one severity bucket.
pub fn bucket_attachment(bucket: &CategoryBucket) -> Attachment {
    let headline = format!(
        "{} {} (out of {},  {:.3}%)",
        bucket.routes.len(),
        bucket.category.status.title(),
        bucket.total,
        bucket.health,
    );
    Attachment {
        color: Some(bucket.category.color.to_string()),
        title: None,
        text: Some(format!(
            "{} {} {} {}",
            bucket.category.emoji,
            headline,
            bucket.category.emoji,
            routes_code_block(&bucket.routes),
        )),
        fallback: Some(format!(
            "{}: {} out of {}, {:.3}%",
            bucket.category.status.title(),
            bucket.routes.len(),
            bucket.total,
            bucket.health,
        )),
        fields: Vec::new(),
    }
}

/// Healthy-server summary: player count, start time, uptime rendering.
pub fn server_status_attachment(status: &ServerStatus, now: DateTime<Utc>) -> Attachment {
    let color = if status.vip { "warning" } else { "good" };
    let in_vip = if status.vip { ", in VIP" } else { "" };
    let started = format_esi_time(&status.start_time);

    Attachment {
        color: Some(color.to_string()),
        title: Some(format!("{} status", SERVER_NAME)),
        text: None,
        fallback: Some(format!(
            "{} status: {} players online, started at {}{}",
            SERVER_NAME, status.players, started, in_vip
        )),
        fields: vec![
            AttachmentField {
                title: "Players Online".into(),
                value: status.players.to_string(),
                short: false,
            },
            AttachmentField {
                title: "Started At".into(),
                value: started,
                short: true,
            },
            AttachmentField {
                title: "Running For".into(),
                value: format_run_time(status.start_time, now),
                short: true,
            },
        ],
    }
}

/// Degraded/offline notice. `offline` distinguishes a definite 503
/// from an indeterminate upstream failure.
pub fn server_offline_attachment(offline: bool) -> Attachment {
    let text = if offline {
        "Offline".to_string()
    } else {
        "Cannot determine server status. It might be offline, or experiencing connectivity issues."
            .to_string()
    };
    Attachment {
        color: Some("danger".to_string()),
        title: Some(format!("{} status", SERVER_NAME)),
        text: Some(text.clone()),
        fallback: Some(format!("{} Status: {}", SERVER_NAME, text)),
        fields: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorize::{categorize, default_categories};
    use chrono::TimeZone;
    use fleetgate_core::{RouteHealth, RouteStatus};

    fn red_routes(n: usize) -> Vec<RouteStatus> {
        (0..n)
            .map(|i| RouteStatus {
                method: "post".into(),
                route: format!("/universe/{i}/"),
                status: RouteHealth::Red,
            })
            .collect()
    }

    #[test]
    fn test_bucket_attachment_carries_color_and_counts() {
        let routes = red_routes(3);
        let buckets = categorize(&routes, &default_categories());
        let attachment = bucket_attachment(&buckets[0]);

        assert_eq!(attachment.color.as_deref(), Some("danger"));
        let text = attachment.text.unwrap();
        assert!(text.contains("3 Red (out of 3"));
        assert!(text.contains("POST /universe/0/"));
        assert!(text.starts_with(":fire:"));
    }

    #[test]
    fn test_routes_code_block_is_fenced() {
        let block = routes_code_block(&red_routes(1));
        assert!(block.starts_with("```"));
        assert!(block.ends_with("```"));
    }

    #[test]
    fn test_server_status_attachment_fields() {
        let status = ServerStatus {
            players: 24712,
            server_version: "1234".into(),
            start_time: Utc.with_ymd_and_hms(2020, 1, 1, 11, 0, 0).unwrap(),
            vip: false,
        };
        let now = Utc.with_ymd_and_hms(2020, 1, 1, 14, 30, 5).unwrap();
        let attachment = server_status_attachment(&status, now);

        assert_eq!(attachment.color.as_deref(), Some("good"));
        assert_eq!(attachment.fields.len(), 3);
        assert_eq!(attachment.fields[0].value, "24712");
        assert_eq!(attachment.fields[1].value, "2020-01-01T11:00:00Z");
        assert_eq!(attachment.fields[2].value, "03h 30m 05s");
    }

    #[test]
    fn test_vip_server_is_flagged_warning() {
        let status = ServerStatus {
            players: 12,
            server_version: String::new(),
            start_time: Utc.with_ymd_and_hms(2020, 1, 1, 11, 0, 0).unwrap(),
            vip: true,
        };
        let attachment = server_status_attachment(&status, Utc::now());
        assert_eq!(attachment.color.as_deref(), Some("warning"));
        assert!(attachment.fallback.unwrap().contains("in VIP"));
    }

    #[test]
    fn test_offline_vs_indeterminate_notice() {
        let offline = server_offline_attachment(true);
        assert_eq!(offline.text.as_deref(), Some("Offline"));

        let indeterminate = server_offline_attachment(false);
        assert!(indeterminate.text.unwrap().contains("Cannot determine"));
    }
}
