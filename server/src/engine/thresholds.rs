use serde::Deserialize;

/// A player-count boundary and the mention posted when it is first reached.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Threshold {
    pub players: u64,
    /// Opaque mention token, e.g. `<@&123456>`. Sent verbatim.
    pub mention: String,
}

impl Threshold {
    pub fn new(players: u64, mention: impl Into<String>) -> Self {
        Self {
            players,
            mention: mention.into(),
        }
    }
}

/// Strictly increasing list of thresholds, fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct ThresholdTable {
    thresholds: Vec<Threshold>,
}

impl ThresholdTable {
    /// Build a table. Thresholds must already be strictly increasing;
    /// equal or out-of-order entries are rejected rather than re-sorted.
    pub fn new(thresholds: Vec<Threshold>) -> Result<Self, String> {
        for pair in thresholds.windows(2) {
            if pair[1].players <= pair[0].players {
                return Err(format!(
                    "Thresholds must be strictly increasing ({} followed by {})",
                    pair[0].players, pair[1].players
                ));
            }
        }
        if let Some(t) = thresholds.iter().find(|t| t.mention.trim().is_empty()) {
            return Err(format!("Threshold {} has an empty mention", t.players));
        }
        Ok(Self { thresholds })
    }

    /// Highest threshold the given player count has reached, if any.
    pub fn highest_satisfied(&self, players: u64) -> Option<&Threshold> {
        self.thresholds.iter().rev().find(|t| players >= t.players)
    }

    /// Thresholds the given player count is strictly below.
    pub fn above(&self, players: u64) -> impl Iterator<Item = &Threshold> {
        self.thresholds.iter().filter(move |t| players < t.players)
    }

    /// The largest configured threshold, used as the alert colour boundary.
    pub fn top(&self) -> Option<u64> {
        self.thresholds.last().map(|t| t.players)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Threshold> {
        self.thresholds.iter()
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }
}

/// Parse the `THRESHOLDS` environment format: `5=<@&1>,8=<@&2>`.
pub fn parse_threshold_list(raw: &str) -> Result<Vec<Threshold>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (count, mention) = entry
                .split_once('=')
                .ok_or_else(|| format!("Invalid threshold entry '{entry}' (expected N=mention)"))?;
            let players = count
                .trim()
                .parse::<u64>()
                .map_err(|_| format!("Invalid threshold player count '{}'", count.trim()))?;
            Ok(Threshold::new(players, mention.trim()))
        })
        .collect()
}
