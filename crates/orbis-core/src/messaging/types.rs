use crate::domain::{BotIdentity, ChannelId, UserId};

/// Channel kinds the moderation rules care about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelKind {
    /// A guild channel carrying free-form text.
    Text,
    /// DMs, threads, voice and everything else.
    Other,
}

/// One inbound chat message, already translated out of the platform SDK.
#[derive(Clone, Debug)]
pub struct InboundMessage {
    pub author_id: UserId,
    pub channel_id: ChannelId,
    pub channel_kind: ChannelKind,
    /// The session's own account was mentioned by this message.
    pub mentions_self: bool,
    pub text: String,
}

/// Text to post into a channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundReply {
    pub channel_id: ChannelId,
    pub text: String,
}

/// Events delivered by a platform session to the event loop.
#[derive(Clone, Debug)]
pub enum InboundEvent {
    /// The session is logged in (sent again after a reconnect).
    Ready(BotIdentity),
    Message(InboundMessage),
}
