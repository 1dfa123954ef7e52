use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{GateError, GateResult};

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

/// Chat workspace credentials and targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Signing secret used to verify inbound event requests.
    #[serde(default)]
    pub signing_secret: String,

    /// Bot token used for outbound Web API calls.
    #[serde(default)]
    pub bot_token: String,

    /// Channel that receives invite requests from the callback flow.
    #[serde(default = "default_mod_channel")]
    pub mod_channel: String,
}

fn default_mod_channel() -> String {
    "#moderation".to_string()
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            signing_secret: String::new(),
            bot_token: String::new(),
            mod_channel: default_mod_channel(),
        }
    }
}

/// EVE SSO application credentials and upstream endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EveConfig {
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    /// Redirect URI registered with the SSO application.
    #[serde(default)]
    pub callback_url: String,

    #[serde(default = "default_sso_authorize_url")]
    pub sso_authorize_url: String,

    #[serde(default = "default_sso_token_url")]
    pub sso_token_url: String,

    /// Base URL for the game's public API.
    #[serde(default = "default_esi_base")]
    pub esi_base: String,
}

fn default_sso_authorize_url() -> String {
    "https://login.eveonline.com/oauth/authorize".to_string()
}

fn default_sso_token_url() -> String {
    "https://login.eveonline.com/oauth/token".to_string()
}

fn default_esi_base() -> String {
    "https://esi.evetech.net".to_string()
}

impl Default for EveConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            callback_url: String::new(),
            sso_authorize_url: default_sso_authorize_url(),
            sso_token_url: default_sso_token_url(),
            esi_base: default_esi_base(),
        }
    }
}

/// Lifetimes for the in-memory stores and the upstream HTTP client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a fetched status snapshot stays servable.
    #[serde(default = "default_status_ttl")]
    pub status_ttl_secs: u64,

    /// How long an issued login state stays redeemable.
    #[serde(default = "default_state_ttl")]
    pub state_ttl_secs: u64,

    /// Interval between background purges of expired entries.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Request timeout for all upstream HTTP calls.
    #[serde(default = "default_upstream_timeout")]
    pub upstream_timeout_secs: u64,
}

fn default_status_ttl() -> u64 {
    60
}

fn default_state_ttl() -> u64 {
    300
}

fn default_sweep_interval() -> u64 {
    30
}

fn default_upstream_timeout() -> u64 {
    10
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            status_ttl_secs: default_status_ttl(),
            state_ttl_secs: default_state_ttl(),
            sweep_interval_secs: default_sweep_interval(),
            upstream_timeout_secs: default_upstream_timeout(),
        }
    }
}

/// Top-level configuration for the gateway binary.
///
/// Loaded from a TOML file (typically `~/.fleetgate/config.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default)]
    pub listen: ListenConfig,

    #[serde(default)]
    pub slack: SlackConfig,

    #[serde(default)]
    pub eve: EveConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

impl GateConfig {
    /// Load configuration from a TOML file. If the file does not exist,
    /// returns a default configuration.
    pub fn load(path: &Path) -> GateResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(GateError::Io)?;
        let config: GateConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> GateResult<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| GateError::Config(format!("TOML serialize error: {}", e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(GateError::Io)?;
        }
        std::fs::write(path, contents).map_err(GateError::Io)?;
        Ok(())
    }

    /// Validate structural configuration values. Credentials are only
    /// required at serve time; see [`GateConfig::validate_secrets`].
    pub fn validate(&self) -> GateResult<()> {
        if self.cache.status_ttl_secs == 0 {
            return Err(GateError::Config("status_ttl_secs must be > 0".into()));
        }
        if self.cache.state_ttl_secs == 0 {
            return Err(GateError::Config("state_ttl_secs must be > 0".into()));
        }
        if self.cache.sweep_interval_secs == 0 {
            return Err(GateError::Config("sweep_interval_secs must be > 0".into()));
        }
        if self.cache.upstream_timeout_secs == 0 {
            return Err(GateError::Config(
                "upstream_timeout_secs must be > 0".into(),
            ));
        }
        for (name, value) in [
            ("eve.sso_authorize_url", &self.eve.sso_authorize_url),
            ("eve.sso_token_url", &self.eve.sso_token_url),
            ("eve.esi_base", &self.eve.esi_base),
        ] {
            if url::Url::parse(value).is_err() {
                return Err(GateError::Config(format!("{} is not a valid URL", name)));
            }
        }
        Ok(())
    }

    /// Check that every credential serving traffic requires is present.
    pub fn validate_secrets(&self) -> GateResult<()> {
        for (name, value) in [
            ("slack.signing_secret", &self.slack.signing_secret),
            ("slack.bot_token", &self.slack.bot_token),
            ("eve.client_id", &self.eve.client_id),
            ("eve.client_secret", &self.eve.client_secret),
            ("eve.callback_url", &self.eve.callback_url),
        ] {
            if value.is_empty() {
                return Err(GateError::Config(format!("{} must be set", name)));
            }
        }
        Ok(())
    }

    /// Return the path to the default config file location.
    pub fn default_config_path() -> PathBuf {
        std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".fleetgate/config.toml"))
            .unwrap_or_else(|_| PathBuf::from(".fleetgate/config.toml"))
    }
}
