//! Gateway demo client
//!
//! Connects one shard, logs every event and the cache size, and exits on
//! Ctrl-C. Run with:
//! ```bash
//! CORD_TOKEN=... cargo run -p cord-gateway
//! ```

use anyhow::Context;
use cord_common::{try_init_tracing, ClientConfig};
use cord_core::{Entity, Guild, Message, User};
use cord_gateway::{GatewayClient, GatewayEvent};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Gateway client stopped");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = ClientConfig::from_env().context("failed to load configuration")?;
    info!(
        env = ?config.env,
        gateway = %config.gateway.url,
        shard_id = config.gateway.shard_id,
        "Configuration loaded"
    );

    let client = GatewayClient::new(&config)?;

    match client.discover_gateway().await {
        Ok(gateway) => info!(url = %gateway.url, shards = gateway.shards, "Gateway recommended"),
        Err(e) => warn!(error = %e, "Gateway discovery failed, using configured URL"),
    }

    let mut events = client.subscribe();
    let watcher = client.clone();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => log_event(&watcher, &event),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Event consumer lagging"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let shutdown = client.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutting down");
            shutdown.shutdown();
        }
    });

    client.run().await?;
    Ok(())
}

fn log_event(client: &GatewayClient, event: &GatewayEvent) {
    match event {
        GatewayEvent::Ready {
            user,
            unavailable_guilds,
            ..
        } => info!(
            user = %user.display_name(),
            guilds = unavailable_guilds.len(),
            "Ready"
        ),
        GatewayEvent::GuildAvailable { guild } | GatewayEvent::GuildJoined { guild } => {
            info!(guild_id = %guild.id(), name = %guild.name(), "Guild available");
        }
        GatewayEvent::MessageReceived { message } => info!(
            channel_id = %message.channel_id(),
            author_id = %message.author_id(),
            "Message received"
        ),
        GatewayEvent::Disconnected {
            code,
            will_reconnect,
            ..
        } => warn!(?code, will_reconnect, "Disconnected"),
        other => info!(event = other.kind(), "Event"),
    }
    tracing::debug!(stats = ?client.cache().stats(), "Cache size");
}
