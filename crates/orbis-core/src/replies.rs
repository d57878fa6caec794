//! Canned replies. Orbis only speaks in lowercase.

use crate::domain::UserId;

/// Which canned reply a message earns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reaction {
    ShoutingWarning,
    EmojiWarning,
    MentionAck,
}

impl Reaction {
    /// Render the reply, mentioning `author`.
    pub fn render(self, author: UserId) -> String {
        let who = author.mention();
        match self {
            Reaction::ShoutingWarning => {
                format!("ugh, {who}, why are you shouting? it's rude. please use lowercase.")
            }
            Reaction::EmojiWarning => format!(
                "i see those silly little pictures, {who}. i find them deeply unserious. please desist."
            ),
            Reaction::MentionAck => format!("yes, {who}. i'm here. and keep your voice down."),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Reaction::ShoutingWarning => "shouting_warning",
            Reaction::EmojiWarning => "emoji_warning",
            Reaction::MentionAck => "mention_ack",
        }
    }
}
