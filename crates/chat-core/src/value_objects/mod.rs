//! Value objects - immutable types that represent domain concepts

mod emoji;
mod export_format;
mod mute_window;
mod search_term;
mod snowflake;

pub use emoji::{is_allowed_emoji, normalize_emoji, ALLOWED_EMOJIS, RED_HEART, THUMBS_UP};
pub use export_format::ExportFormat;
pub use mute_window::MuteWindow;
pub use search_term::SearchTerm;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
