use std::collections::HashSet;

use super::events::LifecycleEvent;
use super::snapshot::ServerSnapshot;

/// Active players and open rooms, maintained from webhook events.
///
/// Membership is exact: a player stays until a Leave arrives for them.
#[derive(Debug, Default)]
pub struct MembershipTracker {
    players: HashSet<String>,
    rooms: HashSet<String>,
}

impl MembershipTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the sets and return the resulting counts.
    pub fn apply(&mut self, event: LifecycleEvent) -> ServerSnapshot {
        match event {
            LifecycleEvent::Join { user, room } => {
                if let Some(user) = user {
                    self.players.insert(user);
                }
                if let Some(room) = room {
                    self.rooms.insert(room);
                }
            }
            LifecycleEvent::Leave { user } => {
                self.players.remove(&user);
            }
            LifecycleEvent::CreateGame { room } => {
                self.rooms.insert(room);
            }
            LifecycleEvent::CloseGame { room } => {
                self.rooms.remove(&room);
            }
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> ServerSnapshot {
        ServerSnapshot::new(self.player_count(), Some(self.room_count()))
    }

    pub fn player_count(&self) -> u64 {
        self.players.len() as u64
    }

    pub fn room_count(&self) -> u64 {
        self.rooms.len() as u64
    }

    pub fn has_player(&self, user: &str) -> bool {
        self.players.contains(user)
    }

    pub fn has_room(&self, room: &str) -> bool {
        self.rooms.contains(room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join(user: &str, room: &str) -> LifecycleEvent {
        LifecycleEvent::Join {
            user: Some(user.into()),
            room: Some(room.into()),
        }
    }

    #[test]
    fn test_membership_fold() {
        let mut m = MembershipTracker::new();

        let snap = m.apply(join("u1", "r1"));
        assert_eq!(snap, ServerSnapshot::new(1, Some(1)));
        assert!(m.has_player("u1"));
        assert!(m.has_room("r1"));

        let snap = m.apply(LifecycleEvent::Leave { user: "u1".into() });
        assert_eq!(snap, ServerSnapshot::new(0, Some(1)));
        assert!(m.has_room("r1"));

        let snap = m.apply(LifecycleEvent::CloseGame { room: "r1".into() });
        assert_eq!(snap, ServerSnapshot::new(0, Some(0)));
    }

    #[test]
    fn test_unknown_leave_and_close_are_noops() {
        let mut m = MembershipTracker::new();
        m.apply(join("u1", "r1"));

        let snap = m.apply(LifecycleEvent::Leave {
            user: "ghost".into(),
        });
        assert_eq!(snap, ServerSnapshot::new(1, Some(1)));

        let snap = m.apply(LifecycleEvent::CloseGame {
            room: "nowhere".into(),
        });
        assert_eq!(snap, ServerSnapshot::new(1, Some(1)));
    }

    #[test]
    fn test_duplicate_join_counted_once() {
        let mut m = MembershipTracker::new();
        m.apply(join("u1", "r1"));
        let snap = m.apply(join("u1", "r1"));
        assert_eq!(snap, ServerSnapshot::new(1, Some(1)));
    }

    #[test]
    fn test_join_without_user_adds_room_only() {
        let mut m = MembershipTracker::new();
        let snap = m.apply(LifecycleEvent::Join {
            user: None,
            room: Some("r1".into()),
        });
        assert_eq!(snap, ServerSnapshot::new(0, Some(1)));
    }

    #[test]
    fn test_create_game_then_join_same_room() {
        let mut m = MembershipTracker::new();
        m.apply(LifecycleEvent::CreateGame { room: "r1".into() });
        let snap = m.apply(join("u1", "r1"));
        assert_eq!(snap, ServerSnapshot::new(1, Some(1)));
    }

    #[test]
    fn test_close_game_keeps_players() {
        let mut m = MembershipTracker::new();
        m.apply(join("u1", "r1"));
        m.apply(join("u2", "r1"));
        let snap = m.apply(LifecycleEvent::CloseGame { room: "r1".into() });
        // Players only leave through Leave events
        assert_eq!(snap, ServerSnapshot::new(2, Some(0)));
    }
}
