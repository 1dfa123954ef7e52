//! Axum HTTP handlers for the gateway.
//!
//! Provides the chat event webhook, the SSO-gated invite flow, and a
//! health check.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use fleetgate_core::Timestamp;
use fleetgate_slack::{
    verify_slack_signature, CallbackEvent, EventEnvelope, SIGNATURE_HEADER, TIMESTAMP_HEADER,
};

use crate::error::{GateError, GateResult};
use crate::processor;
use crate::state::AppState;

/// Identity established by an upstream authentication layer, attached
/// as a request extension. Absence on a protected route is a server
/// misconfiguration, not a caller error.
#[derive(Debug, Clone)]
pub struct AuthedIdentity {
    pub character_name: String,
}

/// Build the Axum router with all endpoints.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/slack/events", post(handle_events))
        .route("/slack/invite", get(handle_invite_start))
        .route("/slack/invite", post(handle_invite_callback))
        .route("/slack/invite/send", post(handle_invite_send))
        .route("/health", get(handle_health))
        .with_state(state)
}

/// POST /slack/events -- signed Events API webhook
async fn handle_events(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> GateResult<impl IntoResponse> {
    let timestamp = headers
        .get(TIMESTAMP_HEADER)
        .and_then(|v| v.to_str().ok());
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());
    if let Err(err) = verify_slack_signature(
        timestamp,
        signature,
        &body,
        &state.config.slack.signing_secret,
        Timestamp::now(),
    ) {
        warn!(reason = %err, "rejected event webhook");
        return Err(err.into());
    }

    match EventEnvelope::parse(&body)? {
        EventEnvelope::UrlVerification { challenge } => {
            info!("answering endpoint verification challenge");
            Ok(Json(serde_json::json!({ "challenge": challenge })).into_response())
        }
        EventEnvelope::EventCallback {
            event: CallbackEvent::Message(msg),
        } => {
            // Ack immediately; the webhook deadline is shorter than a
            // round trip to the upstream APIs. Failures are reported
            // into the originating channel, not to the webhook caller.
            tokio::spawn(processor::process_message(state.clone(), msg));
            Ok(StatusCode::OK.into_response())
        }
        _ => Ok(StatusCode::OK.into_response()),
    }
}

/// Construct the SSO authorization URL carrying a freshly issued state
/// token.
pub fn authorize_url(state: &AppState, token: &str) -> GateResult<String> {
    let mut url = url::Url::parse(&state.config.eve.sso_authorize_url)
        .map_err(|e| GateError::Config(format!("bad authorize URL: {}", e)))?;
    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", &state.config.eve.callback_url)
        .append_pair("client_id", &state.config.eve.client_id)
        .append_pair("state", token);
    Ok(url.into())
}

/// GET /slack/invite -- begin the SSO login flow
async fn handle_invite_start(
    State(state): State<Arc<AppState>>,
) -> GateResult<impl IntoResponse> {
    let token = state.csrf.issue()?;
    let url = authorize_url(&state, &token)?;
    Ok(Json(serde_json::json!({ "url": url })))
}

#[derive(Debug, Deserialize)]
struct InviteCallback {
    #[serde(default)]
    code: String,
    #[serde(default)]
    state: String,
}

/// POST /slack/invite -- SSO redirect landing; redeems the state token
/// and exchanges the authorization code
async fn handle_invite_callback(
    State(state): State<Arc<AppState>>,
    Json(callback): Json<InviteCallback>,
) -> GateResult<impl IntoResponse> {
    if callback.code.is_empty() || callback.state.is_empty() {
        return Err(GateError::Validation(
            "please provide both code and state".to_string(),
        ));
    }
    state.csrf.redeem(&callback.state)?;
    let tokens = state.token_exchanger.exchange(&callback.code).await?;
    info!("completed SSO code exchange");
    Ok(Json(tokens))
}

#[derive(Debug, Deserialize)]
struct InviteSend {
    #[serde(default)]
    email: String,
}

/// POST /slack/invite/send -- authenticated invite request, relayed to
/// the moderation channel
async fn handle_invite_send(
    State(state): State<Arc<AppState>>,
    identity: Option<Extension<AuthedIdentity>>,
    Json(request): Json<InviteSend>,
) -> GateResult<impl IntoResponse> {
    let Some(Extension(identity)) = identity else {
        warn!("invite send reached without an authenticated identity");
        return Err(GateError::Internal);
    };
    if request.email.trim().is_empty() {
        return Err(GateError::Validation(
            "email_invalid: please supply a valid, non-empty email address".to_string(),
        ));
    }

    let notice = format!(
        "{} ({}) has requested a Slack invitation.",
        identity.character_name,
        request.email.trim()
    );
    state
        .chat
        .post_text(&state.config.slack.mod_channel, &notice)
        .await?;
    info!(character = %identity.character_name, "relayed invite request");

    Ok(Json(serde_json::json!({
        "message": "Request received. Watch your inbox for an invitation from the moderators."
    })))
}

/// GET /health -- liveness plus store gauges
async fn handle_health(State(state): State<Arc<AppState>>) -> GateResult<impl IntoResponse> {
    Ok(Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "pending_states": state.csrf.pending_count()?,
        "cached_snapshots": state.status_cache.cached_count()?,
    })))
}
