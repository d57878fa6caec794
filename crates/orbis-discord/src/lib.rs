//! Discord adapter (serenity).
//!
//! This crate implements the `orbis-core` MessagingPort over the Discord HTTP
//! API and feeds gateway events into the core event queue.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::http::Http;

pub mod gateway;
pub mod router;

use orbis_core::{
    domain::{ChannelId, MessageId, MessageRef},
    errors::Error,
    messaging::port::MessagingPort,
    Result,
};

#[derive(Clone)]
pub struct DiscordMessenger {
    http: Arc<Http>,
}

impl DiscordMessenger {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    fn dc_channel(channel_id: ChannelId) -> Result<serenity::model::id::ChannelId> {
        if channel_id.0 == 0 {
            return Err(Error::External("invalid channel id 0".to_string()));
        }
        Ok(serenity::model::id::ChannelId::new(channel_id.0))
    }

    pub(crate) fn map_err(e: serenity::Error) -> Error {
        Error::External(format!("discord error: {e}"))
    }
}

#[async_trait]
impl MessagingPort for DiscordMessenger {
    async fn send_text(&self, channel_id: ChannelId, text: &str) -> Result<MessageRef> {
        let msg = Self::dc_channel(channel_id)?
            .say(&self.http, text)
            .await
            .map_err(Self::map_err)?;

        Ok(MessageRef {
            channel_id,
            message_id: MessageId(msg.id.get()),
        })
    }
}
