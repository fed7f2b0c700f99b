//! Reaction emoji allowlist

/// The only symbols accepted as reactions
pub const ALLOWED_EMOJIS: [&str; 20] = [
    "\u{1F44D}",         // thumbs up
    "\u{1F44E}",         // thumbs down
    "\u{2764}\u{FE0F}",  // red heart
    "\u{1F602}",         // tears of joy
    "\u{1F62E}",         // open mouth
    "\u{1F622}",         // crying
    "\u{1F621}",         // pouting
    "\u{1F389}",         // party popper
    "\u{1F525}",         // fire
    "\u{1F44F}",         // clapping
    "\u{1F64F}",         // folded hands
    "\u{1F60D}",         // heart eyes
    "\u{1F914}",         // thinking
    "\u{1F440}",         // eyes
    "\u{1F4AF}",         // hundred
    "\u{2705}",          // check mark
    "\u{274C}",          // cross mark
    "\u{1F60E}",         // sunglasses
    "\u{1F973}",         // partying face
    "\u{1F44C}",         // ok hand
];

pub const THUMBS_UP: &str = ALLOWED_EMOJIS[0];
pub const RED_HEART: &str = ALLOWED_EMOJIS[2];

/// Check whether `emoji` may be used as a reaction
///
/// A heart sent without the variation selector is treated as the same symbol;
/// use [`normalize_emoji`] before storing.
pub fn is_allowed_emoji(emoji: &str) -> bool {
    ALLOWED_EMOJIS.contains(&normalize_emoji(emoji))
}

/// Canonical stored form of an emoji
pub fn normalize_emoji(emoji: &str) -> &str {
    let trimmed = emoji.trim();
    if trimmed == "\u{2764}" {
        RED_HEART
    } else {
        trimmed
    }
}
