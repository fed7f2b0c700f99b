//! Test support: in-memory repositories and a ready-made service context
//!
//! Enabled for this crate's own tests and, through the `test-utils` feature,
//! for downstream crates.

mod memory;

use std::sync::Arc;

use chat_cache::InMemoryEventBus;
use chat_core::entities::User;
use chat_core::traits::UserRepository;
use chat_core::{ChatKind, MuteWindow, Snowflake, SnowflakeGenerator};

use crate::dto::{ChatResponse, CreateChatCommand};
use crate::services::{ChatService, ServiceContext, ServiceContextBuilder};

pub use memory::InMemoryDatabase;

/// A service context over in-memory storage with a recording event bus
pub struct TestContext {
    pub ctx: ServiceContext,
    pub db: Arc<InMemoryDatabase>,
    pub events: Arc<InMemoryEventBus>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_bus(Arc::new(InMemoryEventBus::new()))
    }

    /// Context whose event bus rejects every publish
    pub fn with_failing_bus() -> Self {
        Self::with_bus(Arc::new(InMemoryEventBus::failing()))
    }

    fn with_bus(events: Arc<InMemoryEventBus>) -> Self {
        let db = Arc::new(InMemoryDatabase::new());
        let ctx = ServiceContextBuilder::new()
            .user_repo(db.clone())
            .chat_repo(db.clone())
            .participant_repo(db.clone())
            .message_repo(db.clone())
            .reaction_repo(db.clone())
            .read_marker_repo(db.clone())
            .event_bus(events.clone())
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
            .mute_window(MuteWindow::default())
            .build()
            .unwrap_or_else(|e| panic!("test context: {e}"));
        Self { ctx, db, events }
    }

    /// Register a user in the directory and return its id
    pub async fn user(&self, username: &str) -> Snowflake {
        let user = User::new(self.ctx.generate_id(), username.to_string());
        UserRepository::create(self.db.as_ref(), &user)
            .await
            .unwrap_or_else(|e| panic!("seed user {username}: {e}"));
        user.id
    }

    /// Create a private chat between `a` and `b`
    pub async fn private_chat(&self, a: Snowflake, b: Snowflake) -> Snowflake {
        let chat = ChatService::new(&self.ctx)
            .create_chat(
                a,
                CreateChatCommand {
                    kind: ChatKind::Private,
                    participant_ids: vec![b],
                    name: None,
                    avatar: None,
                },
            )
            .await
            .unwrap_or_else(|e| panic!("create private chat: {e}"));
        parse_id(&chat)
    }

    /// Create a group chat owned by `creator`
    pub async fn group_chat(&self, creator: Snowflake, others: &[Snowflake]) -> Snowflake {
        let chat = ChatService::new(&self.ctx)
            .create_chat(
                creator,
                CreateChatCommand {
                    kind: ChatKind::Group,
                    participant_ids: others.to_vec(),
                    name: Some("group".to_string()),
                    avatar: None,
                },
            )
            .await
            .unwrap_or_else(|e| panic!("create group chat: {e}"));
        parse_id(&chat)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_id(chat: &ChatResponse) -> Snowflake {
    Snowflake::parse(&chat.id).unwrap_or_else(|e| panic!("chat id {}: {e}", chat.id))
}
