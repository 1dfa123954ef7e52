//! Fleetgate Slack
//!
//! Slack-facing pure logic:
//!
//! - Inbound request-signature verification (v0 HMAC-SHA256 scheme,
//!   constant-time comparison, replay-window check)
//! - Event envelope types for the Events API (URL verification
//!   challenge, message events)
//! - Severity categorization of route statuses and the bounded
//!   route-list rendering used in chat summaries
//! - Attachment types and message builders
//!
//! No I/O happens here; delivery belongs to the gateway's collaborator
//! traits.

pub mod categorize;
pub mod error;
pub mod event;
pub mod message;
pub mod verify;

pub use categorize::{
    categorize, default_categories, health_percentage, render_route_lines, CategoryBucket,
    CategoryDef, ROUTE_LINE_LIMIT,
};
pub use error::{SlackError, SlackResult};
pub use event::{CallbackEvent, EventEnvelope, MessageEvent};
pub use message::{
    bucket_attachment, routes_code_block, server_offline_attachment, server_status_attachment,
    Attachment, AttachmentField, SERVER_NAME,
};
pub use verify::{sign_request, verify_slack_signature, SIGNATURE_HEADER, TIMESTAMP_HEADER};
