use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ccu_relay_server::config::{RelayMode, ServerConfig};
use ccu_relay_server::discord::client::DiscordClient;
use ccu_relay_server::engine::relay::Relay;
use ccu_relay_server::source::poller::run_poller;
use ccu_relay_server::web::app_state::AppState;
use ccu_relay_server::web::router::build_router;

/// Relay game server player counts to a Discord webhook.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the TOML config file. Missing file means env-only config.
    #[arg(short, long, default_value = "ccu-relay.toml")]
    config: String,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(Cli::parse()).await {
        error!(error = %format!("{e:#}"), "ccu-relay failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Misconfiguration is fatal before anything starts.
    let config = ServerConfig::load(&cli.config)?;

    let webhook_url = config
        .discord
        .webhook_url
        .clone()
        .context("discord.webhook_url missing after validation")?;
    let discord = DiscordClient::with_timeout(webhook_url, config.request_timeout())?;
    let relay = Arc::new(Relay::from_config(&config, discord)?);

    let cancel = CancellationToken::new();
    let mut poller = None;

    if config.relay.mode == RelayMode::Poll {
        let url = config
            .source
            .url
            .clone()
            .context("source.url missing after validation")?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("failed to build stats HTTP client")?;
        poller = Some(tokio::spawn(run_poller(
            relay.clone(),
            client,
            url,
            config.poll_interval(),
            cancel.clone(),
        )));
    }

    let app = build_router(Arc::new(AppState { relay }));

    let listener = tokio::net::TcpListener::bind(&config.server.listen_address)
        .await
        .with_context(|| format!("failed to bind {}", config.server.listen_address))?;

    info!(
        address = %config.server.listen_address,
        mode = ?config.relay.mode,
        thresholds = config.thresholds.len(),
        "ccu-relay starting"
    );

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("shutdown signal received");
        shutdown.cancel();
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.clone().cancelled_owned())
        .await
        .context("server error")?;

    if let Some(handle) = poller {
        let _ = handle.await;
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
