//! Gateway session: login, intents and translation of gateway events into
//! the core event queue.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::{
    all::{Channel, ChannelType, Message, Ready},
    client::{Client, Context, EventHandler},
    model::gateway::GatewayIntents,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use orbis_core::{
    domain::{BotIdentity, ChannelId, UserId},
    messaging::{
        port::MessagingPort,
        types::{ChannelKind, InboundEvent, InboundMessage},
    },
    Result,
};

use crate::DiscordMessenger;

/// Gateway intents the bot logs in with. `MESSAGE_CONTENT` is privileged and
/// must also be enabled for the application in the developer portal.
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
}

/// Guild text and announcement channels count as text channels.
pub fn channel_kind(kind: ChannelType) -> ChannelKind {
    match kind {
        ChannelType::Text | ChannelType::News => ChannelKind::Text,
        _ => ChannelKind::Other,
    }
}

/// Mentioned directly, or via `@everyone` / `@here`.
pub fn mentions_self(
    mention_everyone: bool,
    mentioned: impl IntoIterator<Item = UserId>,
    self_id: UserId,
) -> bool {
    mention_everyone || mentioned.into_iter().any(|u| u == self_id)
}

/// Forwards gateway callbacks into the inbound queue; holds no other state.
struct GatewayBridge {
    tx: mpsc::Sender<InboundEvent>,
}

impl GatewayBridge {
    async fn forward(&self, event: InboundEvent) {
        if self.tx.send(event).await.is_err() {
            debug!("inbound queue closed, event dropped");
        }
    }
}

async fn resolve_channel_kind(ctx: &Context, msg: &Message) -> ChannelKind {
    if msg.guild_id.is_none() {
        return ChannelKind::Other;
    }
    match msg.channel(ctx).await {
        Ok(Channel::Guild(gc)) => channel_kind(gc.kind),
        Ok(_) => ChannelKind::Other,
        Err(e) => {
            debug!(channel = msg.channel_id.get(), "channel lookup failed: {e}");
            ChannelKind::Other
        }
    }
}

#[async_trait]
impl EventHandler for GatewayBridge {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        let me = BotIdentity {
            id: UserId(ready.user.id.get()),
            name: ready.user.name.clone(),
        };
        self.forward(InboundEvent::Ready(me)).await;
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let self_id = UserId(ctx.cache.current_user().id.get());
        let channel_kind = resolve_channel_kind(&ctx, &msg).await;

        let inbound = InboundMessage {
            author_id: UserId(msg.author.id.get()),
            channel_id: ChannelId(msg.channel_id.get()),
            channel_kind,
            mentions_self: mentions_self(
                msg.mention_everyone,
                msg.mentions.iter().map(|u| UserId(u.id.get())),
                self_id,
            ),
            text: msg.content,
        };
        self.forward(InboundEvent::Message(inbound)).await;
    }
}

/// A logged-in (not yet running) Discord session.
pub struct DiscordSession {
    pub messenger: Arc<dyn MessagingPort>,
    pub inbound: mpsc::Receiver<InboundEvent>,
    pub gateway: Gateway,
}

/// Drives the gateway connection.
pub struct Gateway {
    client: Client,
}

/// Build the client for `token` and wire its events into a queue of
/// `queue_capacity` events. Nothing connects until [`Gateway::run`].
pub async fn connect(token: &str, queue_capacity: usize) -> Result<DiscordSession> {
    let (tx, inbound) = mpsc::channel(queue_capacity.max(1));

    let client = Client::builder(token, intents())
        .event_handler(GatewayBridge { tx })
        .await
        .map_err(DiscordMessenger::map_err)?;

    let messenger: Arc<dyn MessagingPort> =
        Arc::new(DiscordMessenger::new(client.http.clone()));

    Ok(DiscordSession {
        messenger,
        inbound,
        gateway: Gateway { client },
    })
}

impl Gateway {
    /// Run until the gateway fails or `shutdown` is cancelled. Reconnects are
    /// handled by serenity.
    pub async fn run(mut self, shutdown: CancellationToken) -> Result<()> {
        let shard_manager = self.client.shard_manager.clone();
        let stopper = tokio::spawn(async move {
            shutdown.cancelled().await;
            info!("shutting down gateway");
            shard_manager.shutdown_all().await;
        });

        let res = self.client.start().await;
        stopper.abort();
        res.map_err(DiscordMessenger::map_err)
    }
}
