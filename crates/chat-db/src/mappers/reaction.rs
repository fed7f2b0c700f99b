//! Reaction and read marker entity <-> model mapper

use chat_core::entities::{Reaction, ReadMarker};
use chat_core::value_objects::Snowflake;

use crate::models::{ReactionModel, ReadMarkerModel};

/// Convert ReactionModel to Reaction entity
impl From<ReactionModel> for Reaction {
    fn from(model: ReactionModel) -> Self {
        Reaction {
            id: Snowflake::new(model.id),
            message_id: Snowflake::new(model.message_id),
            user_id: Snowflake::new(model.user_id),
            emoji: model.emoji,
            created_at: model.created_at,
        }
    }
}

impl From<ReadMarkerModel> for ReadMarker {
    fn from(model: ReadMarkerModel) -> Self {
        ReadMarker {
            message_id: Snowflake::new(model.message_id),
            user_id: Snowflake::new(model.user_id),
            read_at: model.read_at,
        }
    }
}
