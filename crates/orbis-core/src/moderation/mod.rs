//! Content rules applied to every inbound text message.

pub mod caps;
pub mod emoji;

pub use caps::{is_shouting, CapsStats};
pub use emoji::has_emoji;

use crate::config::ModerationConfig;

/// A content rule broken by a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Violation {
    Shouting,
    Emoji,
}

/// Apply the rules in priority order (caps before emoji) and return the first hit.
pub fn classify(text: &str, cfg: &ModerationConfig) -> Option<Violation> {
    if is_shouting(text, cfg.caps_threshold, cfg.min_alpha_chars) {
        return Some(Violation::Shouting);
    }
    if has_emoji(text) {
        return Some(Violation::Emoji);
    }
    None
}
