use async_trait::async_trait;

use crate::{
    domain::{ChannelId, MessageRef},
    messaging::types::OutboundReply,
    Result,
};

/// Outbound side of a chat platform session.
///
/// Discord is the only implementation; the handler only ever needs to post
/// plain text into the channel a message came from.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_text(&self, channel_id: ChannelId, text: &str) -> Result<MessageRef>;

    async fn send_reply(&self, reply: &OutboundReply) -> Result<MessageRef> {
        self.send_text(reply.channel_id, &reply.text).await
    }
}
