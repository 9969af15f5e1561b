use serde::Deserialize;

use super::validation::{require_identifier, validate_optional_identifier};

/// Room and player lifecycle events folded by the membership tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A player joined. Either side may be missing from the webhook.
    Join {
        user: Option<String>,
        room: Option<String>,
    },
    /// A player left.
    Leave { user: String },
    /// A room was created.
    CreateGame { room: String },
    /// A room was closed.
    CloseGame { room: String },
}

/// Inbound Photon-style webhook body.
///
/// Photon posts PascalCase fields; everything other than the event type,
/// user and game id is ignored.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "UserId", default)]
    pub user_id: Option<String>,
    #[serde(rename = "GameId", default)]
    pub game_id: Option<String>,
}

impl LifecycleEvent {
    /// Validate a decoded webhook body and turn it into an event.
    pub fn from_payload(payload: WebhookPayload) -> Result<Self, String> {
        match payload.kind.as_str() {
            "Join" => {
                validate_optional_identifier("UserId", payload.user_id.as_deref())?;
                validate_optional_identifier("GameId", payload.game_id.as_deref())?;
                if payload.user_id.is_none() && payload.game_id.is_none() {
                    return Err("Join requires a UserId or GameId".into());
                }
                Ok(Self::Join {
                    user: payload.user_id,
                    room: payload.game_id,
                })
            }
            "Leave" => Ok(Self::Leave {
                user: require_identifier("UserId", payload.user_id)?,
            }),
            "CreateGame" | "Create" => Ok(Self::CreateGame {
                room: require_identifier("GameId", payload.game_id)?,
            }),
            "CloseGame" | "Close" => Ok(Self::CloseGame {
                room: require_identifier("GameId", payload.game_id)?,
            }),
            other => Err(format!("Unknown event type '{other}'")),
        }
    }

    /// Short name used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Leave { .. } => "leave",
            Self::CreateGame { .. } => "create_game",
            Self::CloseGame { .. } => "close_game",
        }
    }
}
