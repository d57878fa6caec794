//! Emoji detection: Unicode pictographs and Discord custom emoji markup.

use std::sync::OnceLock;

use regex::Regex;

/// Inclusive code point ranges treated as emoji.
///
/// Coarse on purpose: skin-tone modifiers, flags and ZWJ sequences are only
/// caught when one of their code points falls in a listed block. The last
/// range is very wide and also covers most non-Latin scripts.
pub const EMOJI_RANGES: [(u32, u32); 6] = [
    (0x1F600, 0x1F64F), // emoticons
    (0x1F300, 0x1F5FF), // misc symbols and pictographs
    (0x1F680, 0x1F6FF), // transport and map
    (0x1F900, 0x1F9FF), // supplemental symbols and pictographs
    (0x2702, 0x27B0),   // dingbats
    (0x24C2, 0x1F251),  // enclosed characters and the rest
];

/// `<:name:id>` or `<a:name:id>` (animated).
const CUSTOM_EMOJI_PATTERN: &str = r"<a?:[A-Za-z0-9_]+:[0-9]+>";

fn custom_emoji_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(CUSTOM_EMOJI_PATTERN).expect("valid regex"))
}

pub fn is_emoji_char(c: char) -> bool {
    let cp = c as u32;
    EMOJI_RANGES
        .iter()
        .any(|&(lo, hi)| (lo..=hi).contains(&cp))
}

pub fn has_unicode_emoji(text: &str) -> bool {
    text.chars().any(is_emoji_char)
}

pub fn has_custom_emoji(text: &str) -> bool {
    custom_emoji_re().is_match(text)
}

/// True if `text` contains a Unicode emoji or custom emoji markup anywhere.
pub fn has_emoji(text: &str) -> bool {
    has_unicode_emoji(text) || has_custom_emoji(text)
}
