use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::thresholds::{Threshold, ThresholdTable, parse_threshold_list};

/// Top-level relay configuration, loaded from ccu-relay.toml.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub relay: RelaySection,
    pub source: SourceSection,
    pub discord: DiscordSection,
    /// Player-count thresholds that ping a role, strictly increasing.
    pub thresholds: Vec<Threshold>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Address for the health/status/webhook HTTP listener.
    pub listen_address: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:3000".into(),
        }
    }
}

/// Which input adapter drives the notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RelayMode {
    /// Periodically fetch a stats document.
    #[default]
    Poll,
    /// Fold inbound lifecycle webhooks into membership sets.
    Webhook,
}

impl FromStr for RelayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "poll" => Ok(Self::Poll),
            "webhook" => Ok(Self::Webhook),
            other => Err(format!("Unknown relay mode '{other}' (expected poll or webhook)")),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RelaySection {
    pub mode: RelayMode,
    /// Whether the room count takes part in change detection and the embed.
    pub track_rooms: bool,
}

impl Default for RelaySection {
    fn default() -> Self {
        Self {
            mode: RelayMode::Poll,
            track_rooms: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SourceSection {
    /// Stats endpoint. Required in poll mode.
    pub url: Option<String>,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            url: None,
            poll_interval_secs: 15,
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct DiscordSection {
    /// Discord webhook execution URL. Always required.
    pub webhook_url: Option<String>,
    /// Overrides the webhook's display name.
    pub username: Option<String>,
}

impl ServerConfig {
    /// Load config from a TOML file, falling back to defaults if the file
    /// doesn't exist. Environment variables override TOML values. The
    /// result is validated; any error here must stop the process.
    pub fn load(path: &str) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {path}"))?;
            Self::from_toml(&contents)
                .with_context(|| format!("failed to parse config file {path}"))?
        } else {
            info!("No config file found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(v) = std::env::var("PORT") {
            let port: u16 = v
                .trim()
                .parse()
                .with_context(|| format!("invalid PORT '{v}'"))?;
            self.server.listen_address = format!("0.0.0.0:{port}");
        }
        if let Ok(v) = std::env::var("LISTEN_ADDRESS") {
            self.server.listen_address = v;
        }
        if let Ok(v) = std::env::var("RELAY_MODE") {
            self.relay.mode = v.parse::<RelayMode>().map_err(|e| anyhow!(e))?;
        }
        if let Ok(v) = std::env::var("TRACK_ROOMS") {
            self.relay.track_rooms = v
                .trim()
                .parse()
                .with_context(|| format!("invalid TRACK_ROOMS '{v}' (expected true or false)"))?;
        }
        if let Ok(v) = std::env::var("API_URL") {
            self.source.url = Some(v);
        }
        if let Ok(v) = std::env::var("POLL_INTERVAL_SECS") {
            self.source.poll_interval_secs = v
                .trim()
                .parse()
                .with_context(|| format!("invalid POLL_INTERVAL_SECS '{v}'"))?;
        }
        if let Ok(v) = std::env::var("REQUEST_TIMEOUT_SECS") {
            self.source.request_timeout_secs = v
                .trim()
                .parse()
                .with_context(|| format!("invalid REQUEST_TIMEOUT_SECS '{v}'"))?;
        }
        if let Ok(v) = std::env::var("DISCORD_WEBHOOK_URL") {
            self.discord.webhook_url = Some(v);
        }
        if let Ok(v) = std::env::var("DISCORD_USERNAME") {
            self.discord.username = Some(v);
        }
        if let Ok(v) = std::env::var("THRESHOLDS") {
            self.thresholds = parse_threshold_list(&v).map_err(|e| anyhow!(e))?;
        }
        Ok(())
    }

    /// Reject configurations the relay cannot run with.
    pub fn validate(&self) -> Result<()> {
        let webhook_url = self
            .discord
            .webhook_url
            .as_deref()
            .ok_or_else(|| anyhow!("Missing DISCORD_WEBHOOK_URL (discord.webhook_url)"))?;
        validate_http_url("discord.webhook_url", webhook_url)?;

        if self.relay.mode == RelayMode::Poll {
            let url = self
                .source
                .url
                .as_deref()
                .ok_or_else(|| anyhow!("Missing API_URL (source.url), required in poll mode"))?;
            validate_http_url("source.url", url)?;
            if self.source.poll_interval_secs == 0 {
                bail!("source.poll_interval_secs must be greater than zero");
            }
        }
        if self.source.request_timeout_secs == 0 {
            bail!("source.request_timeout_secs must be greater than zero");
        }

        self.threshold_table()?;
        Ok(())
    }

    pub fn threshold_table(&self) -> Result<ThresholdTable> {
        ThresholdTable::new(self.thresholds.clone()).map_err(|e| anyhow!(e))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.source.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.request_timeout_secs)
    }
}

fn validate_http_url(field: &str, raw: &str) -> Result<()> {
    let url = Url::parse(raw).with_context(|| format!("{field} is not a valid URL"))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => bail!("{field} must use http or https, got '{other}'"),
    }
}
