//! Inbound Events API envelope types.
//!
//! Only the two envelope kinds the gateway acts on are modeled; every
//! other envelope or inner event deserializes to `Unknown` and is
//! ignored by the dispatcher.

use serde::{Deserialize, Serialize};

use crate::error::{SlackError, SlackResult};

/// Top-level event envelope, tagged by its `type` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEnvelope {
    /// One-time endpoint ownership check; the challenge must be echoed
    /// back verbatim.
    UrlVerification { challenge: String },
    /// A subscribed workspace event.
    EventCallback { event: CallbackEvent },
    #[serde(other)]
    Unknown,
}

impl EventEnvelope {
    /// Parse an envelope from the raw request body.
    pub fn parse(body: &[u8]) -> SlackResult<Self> {
        serde_json::from_slice(body).map_err(|_| SlackError::MalformedEvent)
    }
}

/// Inner event inside an `event_callback` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CallbackEvent {
    Message(MessageEvent),
    #[serde(other)]
    Unknown,
}

/// A channel message event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEvent {
    pub channel: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub ts: Option<String>,
    /// Set for messages posted by bots; used to skip our own output.
    #[serde(default)]
    pub bot_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_verification() {
        let body = br#"{"type":"url_verification","token":"t","challenge":"3eZbrw1aB"}"#;
        match EventEnvelope::parse(body).unwrap() {
            EventEnvelope::UrlVerification { challenge } => assert_eq!(challenge, "3eZbrw1aB"),
            other => panic!("unexpected envelope: {other:?}"),
        }
    }

    #[test]
    fn test_parse_message_event() {
        let body = br#"{
            "type": "event_callback",
            "event": {
                "type": "message",
                "channel": "C123",
                "user": "U456",
                "text": "!tq",
                "ts": "1700000000.000100"
            }
        }"#;
        match EventEnvelope::parse(body).unwrap() {
            EventEnvelope::EventCallback {
                event: CallbackEvent::Message(msg),
            } => {
                assert_eq!(msg.channel, "C123");
                assert_eq!(msg.text, "!tq");
                assert!(msg.bot_id.is_none());
            }
            other => panic!("unexpected envelope: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_envelope_type_is_tolerated() {
        let body = br#"{"type":"app_rate_limited","minute_rate_limited":1}"#;
        assert!(matches!(
            EventEnvelope::parse(body).unwrap(),
            EventEnvelope::Unknown
        ));
    }

    #[test]
    fn test_unknown_inner_event_is_tolerated() {
        let body = br#"{"type":"event_callback","event":{"type":"reaction_added"}}"#;
        match EventEnvelope::parse(body).unwrap() {
            EventEnvelope::EventCallback { event } => {
                assert!(matches!(event, CallbackEvent::Unknown))
            }
            other => panic!("unexpected envelope: {other:?}"),
        }
    }

    #[test]
    fn test_garbage_body_is_malformed() {
        assert_eq!(
            EventEnvelope::parse(b"not json").unwrap_err(),
            SlackError::MalformedEvent
        );
    }
}
