//! # chat-cache
//!
//! Event transport for the chat engine.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Pub/Sub**: `Publisher` implements `chat_core::EventBus` by publishing
//!   JSON events on `chat:{id}` channels
//! - **In-memory bus**: `InMemoryEventBus` records envelopes in process
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use chat_cache::{Publisher, RedisPool, RedisPoolConfig};
//! use chat_core::EventBus;
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let bus: Arc<dyn EventBus> = Arc::new(Publisher::new(pool));
//! bus.publish(&envelope).await?;
//! ```

pub mod memory;
pub mod pool;
pub mod pubsub;

pub use memory::InMemoryEventBus;
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
pub use pubsub::{EventTarget, PubSubChannel, PubSubEvent, Publisher, CHAT_CHANNEL_PREFIX};
