use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::engine::snapshot::ServerSnapshot;

/// Embed colour at or above the alert boundary.
pub const ALERT_COLOR: u32 = 0xff0000;
/// Embed colour below the alert boundary.
pub const NORMAL_COLOR: u32 = 0x00ff99;

pub const EMBED_TITLE: &str = "🎮 Server Activity";

/// Body of a Discord webhook execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookMessage {
    /// Plain message content. Mentions must live here, not in the embed,
    /// for Discord to notify the role.
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    /// ISO-8601, UTC.
    pub timestamp: String,
}

/// Renders snapshots into webhook messages.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    /// Player count at which the embed turns red. `None` keeps it green.
    alert_at: Option<u64>,
    username: Option<String>,
}

impl Formatter {
    pub fn new(alert_at: Option<u64>, username: Option<String>) -> Self {
        Self { alert_at, username }
    }

    pub fn render(
        &self,
        mention: Option<&str>,
        snapshot: ServerSnapshot,
        now: DateTime<Utc>,
    ) -> WebhookMessage {
        let mut description = format!("👥 Players Online: **{}**", snapshot.players);
        if let Some(rooms) = snapshot.rooms {
            description.push_str(&format!("\n🏠 Active Rooms: **{rooms}**"));
        }

        WebhookMessage {
            content: mention.unwrap_or_default().to_string(),
            username: self.username.clone(),
            embeds: vec![Embed {
                title: EMBED_TITLE.to_string(),
                description,
                color: self.color_for(snapshot.players),
                timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            }],
        }
    }

    fn color_for(&self, players: u64) -> u32 {
        match self.alert_at {
            Some(boundary) if players >= boundary => ALERT_COLOR,
            _ => NORMAL_COLOR,
        }
    }
}
