use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::stats::fetch_snapshot;
use crate::engine::notifier::Decision;
use crate::engine::relay::Relay;

/// Run one poll: fetch, then observe. A failed fetch leaves relay state
/// untouched and returns `None`.
pub async fn poll_once(relay: &Relay, client: &reqwest::Client, url: &str) -> Option<Decision> {
    match fetch_snapshot(client, url).await {
        Ok(snapshot) => Some(relay.observe(snapshot).await),
        Err(e) => {
            warn!(error = %format!("{e:#}"), "failed to fetch player count");
            None
        }
    }
}

/// Poll schedule: the first tick completes immediately, and ticks missed
/// while a slow poll was running are delayed rather than fired back to back.
pub fn poll_ticker(interval: Duration) -> Interval {
    let mut ticker = poll_ticker(interval);
    ticker
}

/// Poll the stats endpoint every `interval` until cancelled.
/// The first poll runs immediately.
pub async fn run_poller(
    relay: Arc<Relay>,
    client: reqwest::Client,
    url: String,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = poll_ticker(interval);

    info!(%url, interval_secs = interval.as_secs(), "stats poller started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("stats poller shutting down");
                break;
            }
            _ = ticker.tick() => {
                poll_once(&relay, &client, &url).await;
            }
        }
    }
}
