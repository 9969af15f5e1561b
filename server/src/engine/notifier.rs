use std::collections::BTreeSet;

use super::snapshot::ServerSnapshot;
use super::thresholds::ThresholdTable;

/// Outcome of observing a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Nothing changed since the last recorded snapshot.
    Suppress,
    /// Post an update, optionally pinging the mention of a newly reached threshold.
    Send {
        mention: Option<String>,
        snapshot: ServerSnapshot,
    },
}

impl Decision {
    pub fn is_send(&self) -> bool {
        matches!(self, Decision::Send { .. })
    }

    pub fn mention(&self) -> Option<&str> {
        match self {
            Decision::Send { mention, .. } => mention.as_deref(),
            Decision::Suppress => None,
        }
    }
}

/// Change detection plus threshold ping de-duplication.
///
/// A threshold pings once per stay-above period: it is re-armed as soon as
/// the player count drops strictly below it. When several thresholds are
/// reached at once only the highest one pings.
#[derive(Debug)]
pub struct Notifier {
    thresholds: ThresholdTable,
    last: Option<ServerSnapshot>,
    pinged: BTreeSet<u64>,
}

impl Notifier {
    pub fn new(thresholds: ThresholdTable) -> Self {
        Self {
            thresholds,
            last: None,
            pinged: BTreeSet::new(),
        }
    }

    pub fn observe(&mut self, snapshot: ServerSnapshot) -> Decision {
        if self.last == Some(snapshot) {
            return Decision::Suppress;
        }
        // Recorded before any send happens; a failed post does not roll this back.
        self.last = Some(snapshot);

        for t in self.thresholds.above(snapshot.players) {
            self.pinged.remove(&t.players);
        }

        let mention = match self.thresholds.highest_satisfied(snapshot.players) {
            Some(t) if self.pinged.insert(t.players) => Some(t.mention.clone()),
            _ => None,
        };

        Decision::Send { mention, snapshot }
    }

    pub fn last_snapshot(&self) -> Option<ServerSnapshot> {
        self.last
    }

    /// Thresholds announced during the current stay-above period, ascending.
    pub fn pinged(&self) -> Vec<u64> {
        self.pinged.iter().copied().collect()
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::thresholds::Threshold;

    fn notifier() -> Notifier {
        let table = ThresholdTable::new(vec![
            Threshold::new(5, "5players"),
            Threshold::new(8, "8players"),
            Threshold::new(10, "10players"),
            Threshold::new(16, "16players"),
        ])
        .unwrap();
        Notifier::new(table)
    }

    fn players(n: u64) -> ServerSnapshot {
        ServerSnapshot::players_only(n)
    }

    #[test]
    fn test_first_observation_sends() {
        let mut n = notifier();
        assert_eq!(
            n.observe(players(0)),
            Decision::Send {
                mention: None,
                snapshot: players(0)
            }
        );
    }

    #[test]
    fn test_identical_snapshot_suppressed() {
        let mut n = notifier();
        assert!(n.observe(players(3)).is_send());
        assert_eq!(n.observe(players(3)), Decision::Suppress);
        assert_eq!(n.observe(players(3)), Decision::Suppress);
    }

    #[test]
    fn test_threshold_pings_on_crossing_only() {
        let mut n = notifier();
        let first = n.observe(players(7));
        // 7 already satisfies 5, so the first reading pings it
        assert_eq!(first.mention(), Some("5players"));
        let second = n.observe(players(9));
        assert_eq!(second.mention(), Some("8players"));
        let third = n.observe(players(8));
        assert!(third.is_send());
        assert_eq!(third.mention(), None);
    }

    #[test]
    fn test_no_ping_below_lowest_threshold() {
        let mut n = notifier();
        assert_eq!(n.observe(players(4)).mention(), None);
        assert!(n.pinged().is_empty());
    }

    #[test]
    fn test_rearm_after_drop() {
        let mut n = notifier();
        assert_eq!(n.observe(players(10)).mention(), Some("10players"));
        assert_eq!(n.pinged(), vec![10]);

        let drop = n.observe(players(4));
        assert!(drop.is_send());
        assert_eq!(drop.mention(), None);
        assert!(n.pinged().is_empty());

        assert_eq!(n.observe(players(10)).mention(), Some("10players"));
    }

    #[test]
    fn test_partial_drop_rearms_only_higher_thresholds() {
        let mut n = notifier();
        n.observe(players(5));
        n.observe(players(10));
        assert_eq!(n.pinged(), vec![5, 10]);

        // Below 10 re-arms it, and 8 becomes the highest reached
        assert_eq!(n.observe(players(9)).mention(), Some("8players"));
        assert_eq!(n.pinged(), vec![5, 8]);
        assert_eq!(n.observe(players(10)).mention(), Some("10players"));
        // 5 was never re-armed
        assert_eq!(n.observe(players(6)).mention(), None);
        assert_eq!(n.pinged(), vec![5]);
    }

    #[test]
    fn test_highest_threshold_wins() {
        let mut n = notifier();
        let d = n.observe(players(20));
        assert_eq!(d.mention(), Some("16players"));
        assert_eq!(n.pinged(), vec![16]);
        assert_eq!(
            n.observe(players(17)),
            Decision::Send {
                mention: None,
                snapshot: players(17)
            }
        );
    }

    #[test]
    fn test_room_only_change_sends() {
        let mut n = notifier();
        n.observe(ServerSnapshot::new(6, Some(1)));
        let d = n.observe(ServerSnapshot::new(6, Some(2)));
        assert!(d.is_send());
        assert_eq!(d.mention(), None);
    }

    #[test]
    fn test_last_snapshot_recorded() {
        let mut n = notifier();
        assert_eq!(n.last_snapshot(), None);
        n.observe(ServerSnapshot::new(2, Some(0)));
        assert_eq!(n.last_snapshot(), Some(ServerSnapshot::new(2, Some(0))));
    }

    #[test]
    fn test_empty_table_never_pings() {
        let mut n = Notifier::new(ThresholdTable::default());
        assert_eq!(n.observe(players(1000)).mention(), None);
        assert!(n.pinged().is_empty());
    }

    #[test]
    fn test_end_to_end_sequence() {
        let mut n = notifier();
        let seq = [(3, 1), (3, 1), (6, 1), (6, 2), (2, 0)];
        let decisions: Vec<Decision> = seq
            .iter()
            .map(|&(p, r)| n.observe(ServerSnapshot::new(p, Some(r))))
            .collect();

        let sent: Vec<usize> = decisions
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_send())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(sent, vec![0, 2, 3, 4]);

        assert_eq!(decisions[0].mention(), None);
        assert_eq!(decisions[1], Decision::Suppress);
        assert_eq!(decisions[2].mention(), Some("5players"));
        assert_eq!(decisions[3].mention(), None);
        assert_eq!(decisions[4].mention(), None);
        assert!(n.pinged().is_empty());
    }
}
