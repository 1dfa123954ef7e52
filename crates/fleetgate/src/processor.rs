//! Chat command parsing and dispatch.
//!
//! Commands arrive as ordinary channel messages. Anything that is not
//! a recognized command is ignored; failures while serving a command
//! are reported back into the channel as plain text.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use fleetgate_core::ApiVariant;
use fleetgate_slack::{
    bucket_attachment, categorize, default_categories, server_offline_attachment,
    server_status_attachment, MessageEvent,
};

use crate::clients::ServerProbe;
use crate::error::GateResult;
use crate::state::AppState;

const DEFAULT_VARIANT: &str = "latest";

/// A recognized chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `!tq`: report the game server's status.
    ServerStatus,
    /// `!esi [--version=X]`: report degraded API routes.
    RouteStatus { variant: ApiVariant },
}

/// Parse a message into a command, if it is one.
pub fn parse_command(text: &str) -> Option<Command> {
    let mut tokens = text.split_whitespace();
    match tokens.next()? {
        "!tq" => Some(Command::ServerStatus),
        "!esi" => {
            let variant = tokens
                .find_map(|token| token.strip_prefix("--version="))
                .filter(|v| !v.is_empty())
                .unwrap_or(DEFAULT_VARIANT);
            Some(Command::RouteStatus {
                variant: ApiVariant::new(variant),
            })
        }
        _ => None,
    }
}

/// Handle one inbound message end to end. Spawned per event; never
/// returns an error because there is no caller to report it to, only
/// the channel the message came from.
pub async fn process_message(state: Arc<AppState>, msg: MessageEvent) {
    // Skip bot traffic, our own replies included.
    if msg.bot_id.is_some() {
        return;
    }
    let Some(command) = parse_command(&msg.text) else {
        return;
    };
    debug!(channel = %msg.channel, ?command, "dispatching command");

    let outcome = match &command {
        Command::ServerStatus => post_server_status(&state, &msg.channel).await,
        Command::RouteStatus { variant } => {
            post_route_status(&state, &msg.channel, variant).await
        }
    };
    if let Err(err) = outcome {
        warn!(channel = %msg.channel, error = %err, "command failed");
        if let Err(post_err) = state
            .chat
            .post_text(&msg.channel, &format!("Sorry, that didn't work: {}", err))
            .await
        {
            warn!(error = %post_err, "could not deliver failure notice");
        }
    }
}

async fn post_server_status(state: &AppState, channel: &str) -> GateResult<()> {
    let attachment = match state.status_api.server_status().await? {
        ServerProbe::Online(status) => server_status_attachment(&status, Utc::now()),
        ServerProbe::Offline => server_offline_attachment(true),
        ServerProbe::Indeterminate => server_offline_attachment(false),
    };
    state.chat.post_attachments(channel, &[attachment]).await
}

async fn post_route_status(state: &AppState, channel: &str, variant: &ApiVariant) -> GateResult<()> {
    let snapshot = match state.status_cache.lookup(variant)? {
        Some(snapshot) => snapshot,
        None => {
            let api = state.status_api.clone();
            state
                .status_cache
                .refresh(variant.clone(), move |v| async move {
                    api.route_statuses(&v).await
                })
                .await?
        }
    };

    let buckets = categorize(&snapshot.routes, &default_categories());
    if buckets.is_empty() {
        return state.chat.post_text(channel, ":ok_hand:").await;
    }
    let attachments: Vec<_> = buckets.iter().map(bucket_attachment).collect();
    state.chat.post_attachments(channel, &attachments).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_server_status_command() {
        assert_eq!(parse_command("!tq"), Some(Command::ServerStatus));
        assert_eq!(parse_command("  !tq  "), Some(Command::ServerStatus));
    }

    #[test]
    fn test_parse_route_status_defaults_to_latest() {
        assert_eq!(
            parse_command("!esi"),
            Some(Command::RouteStatus {
                variant: ApiVariant::new("latest")
            })
        );
    }

    #[test]
    fn test_parse_route_status_with_version() {
        assert_eq!(
            parse_command("!esi --version=dev"),
            Some(Command::RouteStatus {
                variant: ApiVariant::new("dev")
            })
        );
    }

    #[test]
    fn test_parse_empty_version_falls_back() {
        assert_eq!(
            parse_command("!esi --version="),
            Some(Command::RouteStatus {
                variant: ApiVariant::new("latest")
            })
        );
    }

    #[test]
    fn test_ordinary_chatter_is_not_a_command() {
        assert_eq!(parse_command("hello there"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("!unknown"), None);
        // commands must lead the message
        assert_eq!(parse_command("please run !tq"), None);
    }
}
