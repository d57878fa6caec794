//! Per-message moderation policy.

use tracing::{debug, info};

use crate::{
    config::ModerationConfig,
    domain::{MessageRef, UserId},
    messaging::{
        port::MessagingPort,
        types::{ChannelKind, InboundMessage, OutboundReply},
    },
    moderation::{classify, Violation},
    replies::Reaction,
    Result,
};

/// Decides how the bot reacts to a single inbound message.
///
/// Holds no per-message state: every message is judged on its own, so one
/// handler can serve concurrent messages from any number of channels.
#[derive(Clone, Debug)]
pub struct MessageHandler {
    moderation: ModerationConfig,
    self_id: UserId,
}

impl MessageHandler {
    pub fn new(moderation: ModerationConfig, self_id: UserId) -> Self {
        Self {
            moderation,
            self_id,
        }
    }

    /// Rules, in order: ignore own messages and non-text channels, then caps,
    /// then emoji, then answer a mention. First match wins.
    pub fn decide(&self, msg: &InboundMessage) -> Option<Reaction> {
        if msg.author_id == self.self_id {
            return None;
        }
        if msg.channel_kind != ChannelKind::Text {
            return None;
        }

        match classify(&msg.text, &self.moderation) {
            Some(Violation::Shouting) => Some(Reaction::ShoutingWarning),
            Some(Violation::Emoji) => Some(Reaction::EmojiWarning),
            None if msg.mentions_self => Some(Reaction::MentionAck),
            None => None,
        }
    }

    pub fn reply_for(&self, msg: &InboundMessage) -> Option<(Reaction, OutboundReply)> {
        let reaction = self.decide(msg)?;
        Some((
            reaction,
            OutboundReply {
                channel_id: msg.channel_id,
                text: reaction.render(msg.author_id),
            },
        ))
    }

    /// Send at most one reply for `msg`. Delivery errors are returned as-is;
    /// there is no retry.
    pub async fn handle(
        &self,
        msg: &InboundMessage,
        messenger: &dyn MessagingPort,
    ) -> Result<Option<MessageRef>> {
        let Some((reaction, reply)) = self.reply_for(msg) else {
            debug!(
                author = msg.author_id.0,
                channel = msg.channel_id.0,
                "no reaction"
            );
            return Ok(None);
        };

        info!(
            reaction = reaction.as_str(),
            author = msg.author_id.0,
            channel = msg.channel_id.0,
            "replying"
        );
        let sent = messenger.send_reply(&reply).await?;
        Ok(Some(sent))
    }
}
