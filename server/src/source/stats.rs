use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::engine::snapshot::ServerSnapshot;

/// Stats document served by the game backend.
///
/// Counts must be JSON integers; strings, floats and negatives are rejected
/// instead of being read as zero. The player count comes from `players`,
/// or from `ccu` when `players` is absent or null.
#[derive(Debug, Deserialize)]
struct StatsDocument {
    #[serde(default)]
    players: Option<u64>,
    #[serde(default)]
    ccu: Option<u64>,
    #[serde(default)]
    rooms: Option<u64>,
}

/// Decode a stats response body into a snapshot.
pub fn parse_stats(body: &[u8]) -> Result<ServerSnapshot> {
    let doc: StatsDocument =
        serde_json::from_slice(body).context("stats response is not a valid stats document")?;
    let players = doc
        .players
        .or(doc.ccu)
        .ok_or_else(|| anyhow!("stats response has no numeric 'players' or 'ccu' field"))?;
    Ok(ServerSnapshot::new(players, doc.rooms))
}

/// GET the stats endpoint and decode it.
pub async fn fetch_snapshot(client: &reqwest::Client, url: &str) -> Result<ServerSnapshot> {
    let body = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .context("stats request failed")?
        .error_for_status()
        .context("stats endpoint returned an error status")?
        .bytes()
        .await
        .context("failed to read stats response body")?;

    parse_stats(&body)
}
