use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, info};

use super::events::LifecycleEvent;
use super::membership::MembershipTracker;
use super::notifier::{Decision, Notifier};
use super::snapshot::ServerSnapshot;
use super::thresholds::ThresholdTable;
use crate::config::{RelayMode, ServerConfig};
use crate::discord::client::DiscordClient;
use crate::discord::embed::Formatter;

/// Mutable relay state. Kept behind one lock so that folding an event and
/// observing its snapshot happen as a single step.
struct RelayState {
    notifier: Notifier,
    membership: MembershipTracker,
}

/// Read-only view served by `GET /status`.
#[derive(Debug, Clone, Serialize)]
pub struct RelayStatus {
    pub mode: RelayMode,
    pub track_rooms: bool,
    pub last_snapshot: Option<ServerSnapshot>,
    pub pinged_thresholds: Vec<u64>,
    /// Live membership counts, webhook mode only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership: Option<ServerSnapshot>,
}

/// The relay core shared by the poller and the HTTP handlers.
///
/// Decisions are taken under the state lock; the Discord post happens after
/// it is released and never rolls state back.
pub struct Relay {
    mode: RelayMode,
    track_rooms: bool,
    state: Mutex<RelayState>,
    formatter: Formatter,
    discord: DiscordClient,
}

impl Relay {
    pub fn new(
        mode: RelayMode,
        track_rooms: bool,
        thresholds: ThresholdTable,
        username: Option<String>,
        discord: DiscordClient,
    ) -> Self {
        let formatter = Formatter::new(thresholds.top(), username);
        Self {
            mode,
            track_rooms,
            state: Mutex::new(RelayState {
                notifier: Notifier::new(thresholds),
                membership: MembershipTracker::new(),
            }),
            formatter,
            discord,
        }
    }

    pub fn from_config(config: &ServerConfig, discord: DiscordClient) -> Result<Self> {
        Ok(Self::new(
            config.relay.mode,
            config.relay.track_rooms,
            config.threshold_table()?,
            config.discord.username.clone(),
            discord,
        ))
    }

    pub fn mode(&self) -> RelayMode {
        self.mode
    }

    /// Feed a snapshot from the stats source.
    pub async fn observe(&self, snapshot: ServerSnapshot) -> Decision {
        let snapshot = self.tracked(snapshot);
        let decision = self.lock().notifier.observe(snapshot);
        self.deliver(&decision).await;
        decision
    }

    /// Fold a lifecycle event into membership and observe the new counts.
    pub async fn apply_event(&self, event: LifecycleEvent) -> Decision {
        let kind = event.kind();
        let decision = {
            let mut state = self.lock();
            let snapshot = self.tracked(state.membership.apply(event));
            debug!(event = kind, players = snapshot.players, "applied lifecycle event");
            state.notifier.observe(snapshot)
        };
        self.deliver(&decision).await;
        decision
    }

    pub fn status(&self) -> RelayStatus {
        let state = self.lock();
        RelayStatus {
            mode: self.mode,
            track_rooms: self.track_rooms,
            last_snapshot: state.notifier.last_snapshot(),
            pinged_thresholds: state.notifier.pinged(),
            membership: match self.mode {
                RelayMode::Webhook => Some(state.membership.snapshot()),
                RelayMode::Poll => None,
            },
        }
    }

    fn tracked(&self, snapshot: ServerSnapshot) -> ServerSnapshot {
        if self.track_rooms {
            snapshot
        } else {
            snapshot.without_rooms()
        }
    }

    fn lock(&self) -> MutexGuard<'_, RelayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Post a `Send` decision. Failures are logged and dropped; the next
    /// state change is the next chance to notify.
    async fn deliver(&self, decision: &Decision) {
        let Decision::Send { mention, snapshot } = decision else {
            return;
        };

        let message = self
            .formatter
            .render(mention.as_deref(), *snapshot, Utc::now());

        match self.discord.send(&message).await {
            Ok(()) => info!(
                players = snapshot.players,
                rooms = ?snapshot.rooms,
                mention = mention.as_deref().unwrap_or(""),
                "Discord updated"
            ),
            Err(e) => error!(
                players = snapshot.players,
                error = %format!("{e:#}"),
                "failed to send Discord message"
            ),
        }
    }
}
