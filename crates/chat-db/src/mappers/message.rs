//! Message entity <-> model mapper

use chat_core::entities::{Message, MessageType};
use chat_core::traits::SearchHit;
use chat_core::value_objects::Snowflake;

use crate::models::{MessageModel, SearchHitModel};

/// Convert MessageModel to Message entity
impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: Snowflake::new(model.id),
            chat_id: Snowflake::new(model.chat_id),
            sender_id: Snowflake::new(model.sender_id),
            content: model.content,
            message_type: MessageType::from(model.message_type),
            blob_ref: model.blob_ref,
            reply_to: model.reply_to.map(Snowflake::new),
            forwarded_from: model.forwarded_from.map(Snowflake::new),
            deleted_for_sender: model.deleted_for_sender,
            deleted_for_all: model.deleted_for_all,
            created_at: model.created_at,
        }
    }
}

impl From<SearchHitModel> for SearchHit {
    fn from(model: SearchHitModel) -> Self {
        SearchHit {
            message: Message::from(model.message),
            occurrences: model.occurrences,
        }
    }
}

/// Convert Message entity reference to values for database insertion
pub struct MessageInsert<'a> {
    pub id: i64,
    pub chat_id: i64,
    pub sender_id: i64,
    pub content: &'a str,
    pub message_type: i16,
    pub blob_ref: Option<&'a str>,
    pub reply_to: Option<i64>,
    pub forwarded_from: Option<i64>,
}

impl<'a> MessageInsert<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self {
            id: message.id.into_inner(),
            chat_id: message.chat_id.into_inner(),
            sender_id: message.sender_id.into_inner(),
            content: &message.content,
            message_type: message.message_type.as_i16(),
            blob_ref: message.blob_ref.as_deref(),
            reply_to: message.reply_to.map(Snowflake::into_inner),
            forwarded_from: message.forwarded_from.map(Snowflake::into_inner),
        }
    }
}
