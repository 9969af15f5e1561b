use serde::{Deserialize, Serialize};

/// Point-in-time reading of the tracked counts.
///
/// `rooms` is `None` when the source does not report rooms or room tracking
/// is turned off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSnapshot {
    pub players: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rooms: Option<u64>,
}

impl ServerSnapshot {
    pub fn new(players: u64, rooms: Option<u64>) -> Self {
        Self { players, rooms }
    }

    pub fn players_only(players: u64) -> Self {
        Self {
            players,
            rooms: None,
        }
    }

    /// Drop the room count so it no longer takes part in change detection.
    pub fn without_rooms(self) -> Self {
        Self {
            players: self.players,
            rooms: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_includes_rooms() {
        assert_eq!(ServerSnapshot::new(3, Some(1)), ServerSnapshot::new(3, Some(1)));
        assert_ne!(ServerSnapshot::new(3, Some(1)), ServerSnapshot::new(3, Some(2)));
        assert_ne!(ServerSnapshot::new(3, Some(1)), ServerSnapshot::players_only(3));
    }

    #[test]
    fn test_without_rooms() {
        let snap = ServerSnapshot::new(6, Some(2)).without_rooms();
        assert_eq!(snap, ServerSnapshot::players_only(6));
    }

    #[test]
    fn test_serialize_skips_missing_rooms() {
        let json = serde_json::to_value(ServerSnapshot::players_only(4)).unwrap();
        assert_eq!(json, serde_json::json!({"players": 4}));
    }
}
