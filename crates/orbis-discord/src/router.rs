use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use orbis_core::{config::Config, dispatch::run_event_loop};

use crate::gateway::{connect, DiscordSession};

/// Log in, then run the gateway and the event loop until `shutdown` fires or
/// the gateway fails.
pub async fn run(cfg: Arc<Config>, shutdown: CancellationToken) -> anyhow::Result<()> {
    info!("config: {}", cfg.config_path.display());
    info!(
        "caps threshold: {}, min letters: {}",
        cfg.moderation.caps_threshold, cfg.moderation.min_alpha_chars
    );

    let DiscordSession {
        messenger,
        inbound,
        gateway,
    } = connect(&cfg.discord_token, cfg.queue_capacity).await?;

    let events = tokio::spawn(run_event_loop(
        cfg.moderation,
        messenger,
        inbound,
        shutdown.clone(),
    ));

    let res = gateway.run(shutdown.clone()).await;

    // Stop the loop; events already queued still get handled before it returns.
    shutdown.cancel();
    if let Err(e) = events.await {
        warn!("event loop task failed: {e}");
    }

    res?;
    Ok(())
}
