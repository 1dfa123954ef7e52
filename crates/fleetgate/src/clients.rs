//! Collaborator seams for everything that crosses the network, plus
//! the production HTTP implementations.
//!
//! Handlers and the event processor only see the traits; tests swap in
//! in-memory fakes.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::StatusCode;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use fleetgate_core::{ApiVariant, RouteStatus, ServerStatus};
use fleetgate_slack::Attachment;

use crate::config::{CacheConfig, EveConfig, SlackConfig};
use crate::error::{GateError, GateResult};

/// Outcome of probing the game server's status endpoint.
#[derive(Debug, Clone)]
pub enum ServerProbe {
    Online(ServerStatus),
    /// The endpoint answered 503: the server is down for certain.
    Offline,
    /// Any other failure; the server may or may not be up.
    Indeterminate,
}

/// Posts messages into the chat workspace.
#[async_trait]
pub trait ChatPoster: Send + Sync {
    async fn post_text(&self, channel: &str, text: &str) -> GateResult<()>;
    async fn post_attachments(&self, channel: &str, attachments: &[Attachment]) -> GateResult<()>;
}

/// Reads server and route health from the game's public API.
#[async_trait]
pub trait StatusApi: Send + Sync {
    async fn server_status(&self) -> GateResult<ServerProbe>;
    async fn route_statuses(&self, variant: &ApiVariant) -> GateResult<Vec<RouteStatus>>;
}

/// Exchanges an SSO authorization code for a token response.
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    async fn exchange(&self, code: &str) -> GateResult<serde_json::Value>;
}

/// Shared upstream HTTP client with a bounded per-request timeout.
pub fn build_http_client(cache: &CacheConfig) -> GateResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(cache.upstream_timeout_secs))
        .build()
        .map_err(GateError::from)
}

// ---------------------------------------------------------------------------
// Chat Web API
// ---------------------------------------------------------------------------

pub struct SlackWebApi {
    http: reqwest::Client,
    bot_token: String,
    base: String,
}

impl SlackWebApi {
    pub fn new(http: reqwest::Client, config: &SlackConfig) -> Self {
        Self {
            http,
            bot_token: config.bot_token.clone(),
            base: "https://slack.com/api".to_string(),
        }
    }

    async fn post_message(&self, payload: serde_json::Value) -> GateResult<()> {
        let response = self
            .http
            .post(format!("{}/chat.postMessage", self.base))
            .bearer_auth(&self.bot_token)
            .json(&payload)
            .send()
            .await?;
        let status = response.status();
        let body: serde_json::Value = response.json().await?;
        if !status.is_success() || body.get("ok").and_then(|v| v.as_bool()) != Some(true) {
            let reason = body
                .get("error")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");
            return Err(GateError::Upstream(format!(
                "chat.postMessage failed: {}",
                reason
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatPoster for SlackWebApi {
    async fn post_text(&self, channel: &str, text: &str) -> GateResult<()> {
        debug!(channel, "posting text message");
        self.post_message(json!({ "channel": channel, "text": text }))
            .await
    }

    async fn post_attachments(&self, channel: &str, attachments: &[Attachment]) -> GateResult<()> {
        debug!(channel, count = attachments.len(), "posting attachments");
        self.post_message(json!({ "channel": channel, "attachments": attachments }))
            .await
    }
}

// ---------------------------------------------------------------------------
// Game status API
// ---------------------------------------------------------------------------

pub struct EsiStatusApi {
    http: reqwest::Client,
    base: String,
}

impl EsiStatusApi {
    pub fn new(http: reqwest::Client, config: &EveConfig) -> Self {
        Self {
            http,
            base: config.esi_base.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl StatusApi for EsiStatusApi {
    async fn server_status(&self) -> GateResult<ServerProbe> {
        let response = match self
            .http
            .get(format!("{}/v1/status/", self.base))
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                debug!(error = %err, "status probe did not complete");
                return Ok(ServerProbe::Indeterminate);
            }
        };
        match response.status() {
            StatusCode::OK => {
                let status: ServerStatus = response.json().await?;
                Ok(ServerProbe::Online(status))
            }
            StatusCode::SERVICE_UNAVAILABLE => Ok(ServerProbe::Offline),
            other => {
                debug!(status = %other, "status probe answered non-200");
                Ok(ServerProbe::Indeterminate)
            }
        }
    }

    async fn route_statuses(&self, variant: &ApiVariant) -> GateResult<Vec<RouteStatus>> {
        let response = self
            .http
            .get(format!("{}/status.json", self.base))
            .query(&[("version", variant.as_str())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(GateError::Upstream(format!(
                "route status fetch answered {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }
}

// ---------------------------------------------------------------------------
// SSO token exchange
// ---------------------------------------------------------------------------

pub struct EveSsoExchanger {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl EveSsoExchanger {
    pub fn new(http: reqwest::Client, config: &EveConfig) -> Self {
        Self {
            http,
            token_url: config.sso_token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        }
    }

    fn basic_credentials(&self) -> String {
        BASE64.encode(format!("{}:{}", self.client_id, self.client_secret))
    }
}

#[async_trait]
impl TokenExchanger for EveSsoExchanger {
    async fn exchange(&self, code: &str) -> GateResult<serde_json::Value> {
        let response = self
            .http
            .post(&self.token_url)
            .header("Authorization", format!("Basic {}", self.basic_credentials()))
            .form(&[("grant_type", "authorization_code"), ("code", code)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(GateError::Upstream(format!(
                "token exchange answered {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GateConfig;

    #[test]
    fn test_basic_credentials_encoding() {
        let mut config = GateConfig::default();
        config.eve.client_id = "id".into();
        config.eve.client_secret = "secret".into();
        let exchanger = EveSsoExchanger::new(reqwest::Client::new(), &config.eve);
        // base64("id:secret")
        assert_eq!(exchanger.basic_credentials(), "aWQ6c2VjcmV0");
    }

    #[test]
    fn test_esi_base_trailing_slash_is_trimmed() {
        let mut config = GateConfig::default();
        config.eve.esi_base = "https://esi.example.com/".into();
        let api = EsiStatusApi::new(reqwest::Client::new(), &config.eve);
        assert_eq!(api.base, "https://esi.example.com");
    }
}
