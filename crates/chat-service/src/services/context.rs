//! Service context - dependency container for services
//!
//! Holds the repositories, the event bus and the chat limits every service
//! reads from.

use std::sync::Arc;

use chat_core::traits::{
    ChatRepository, EventBus, MessageRepository, ParticipantRepository, ReactionRepository,
    ReadMarkerRepository, UserRepository,
};
use chat_core::{MuteWindow, Snowflake, SnowflakeGenerator};

use super::error::{ServiceError, ServiceResult};

/// Default upper bound for `per_page` on transcript exports
pub const DEFAULT_EXPORT_MAX_PAGE_SIZE: i64 = 1000;

/// Service context containing all dependencies
///
/// Cloning is cheap: every dependency sits behind an `Arc`.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    chat_repo: Arc<dyn ChatRepository>,
    participant_repo: Arc<dyn ParticipantRepository>,
    message_repo: Arc<dyn MessageRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,
    read_marker_repo: Arc<dyn ReadMarkerRepository>,

    // Real-time fan-out
    event_bus: Arc<dyn EventBus>,

    snowflake_generator: Arc<SnowflakeGenerator>,

    // Limits
    mute_window: MuteWindow,
    export_max_page_size: i64,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        chat_repo: Arc<dyn ChatRepository>,
        participant_repo: Arc<dyn ParticipantRepository>,
        message_repo: Arc<dyn MessageRepository>,
        reaction_repo: Arc<dyn ReactionRepository>,
        read_marker_repo: Arc<dyn ReadMarkerRepository>,
        event_bus: Arc<dyn EventBus>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        mute_window: MuteWindow,
        export_max_page_size: i64,
    ) -> Self {
        Self {
            user_repo,
            chat_repo,
            participant_repo,
            message_repo,
            reaction_repo,
            read_marker_repo,
            event_bus,
            snowflake_generator,
            mute_window,
            export_max_page_size,
        }
    }

    // === Repositories ===

    /// Get the user directory
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the chat repository
    pub fn chat_repo(&self) -> &dyn ChatRepository {
        self.chat_repo.as_ref()
    }

    /// Get the participant repository
    pub fn participant_repo(&self) -> &dyn ParticipantRepository {
        self.participant_repo.as_ref()
    }

    /// Get the message repository
    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    /// Get the reaction repository
    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    /// Get the read marker repository
    pub fn read_marker_repo(&self) -> &dyn ReadMarkerRepository {
        self.read_marker_repo.as_ref()
    }

    // === Events ===

    /// Get the event bus
    pub fn event_bus(&self) -> &dyn EventBus {
        self.event_bus.as_ref()
    }

    // === Ids & limits ===

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }

    pub fn mute_window(&self) -> MuteWindow {
        self.mute_window
    }

    pub fn export_max_page_size(&self) -> i64 {
        self.export_max_page_size
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("event_bus", &"dyn EventBus")
            .field("worker_id", &self.snowflake_generator.worker_id())
            .field("mute_window", &self.mute_window)
            .field("export_max_page_size", &self.export_max_page_size)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    chat_repo: Option<Arc<dyn ChatRepository>>,
    participant_repo: Option<Arc<dyn ParticipantRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    read_marker_repo: Option<Arc<dyn ReadMarkerRepository>>,
    event_bus: Option<Arc<dyn EventBus>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    mute_window: MuteWindow,
    export_max_page_size: i64,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            user_repo: None,
            chat_repo: None,
            participant_repo: None,
            message_repo: None,
            reaction_repo: None,
            read_marker_repo: None,
            event_bus: None,
            snowflake_generator: None,
            mute_window: MuteWindow::default(),
            export_max_page_size: DEFAULT_EXPORT_MAX_PAGE_SIZE,
        }
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn chat_repo(mut self, repo: Arc<dyn ChatRepository>) -> Self {
        self.chat_repo = Some(repo);
        self
    }

    pub fn participant_repo(mut self, repo: Arc<dyn ParticipantRepository>) -> Self {
        self.participant_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn read_marker_repo(mut self, repo: Arc<dyn ReadMarkerRepository>) -> Self {
        self.read_marker_repo = Some(repo);
        self
    }

    pub fn event_bus(mut self, bus: Arc<dyn EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn mute_window(mut self, window: MuteWindow) -> Self {
        self.mute_window = window;
        self
    }

    pub fn export_max_page_size(mut self, max: i64) -> Self {
        self.export_max_page_size = max;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        if self.export_max_page_size < 1 {
            return Err(ServiceError::validation(
                "export_max_page_size must be positive",
            ));
        }

        Ok(ServiceContext::new(
            self.user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            self.chat_repo
                .ok_or_else(|| ServiceError::validation("chat_repo is required"))?,
            self.participant_repo
                .ok_or_else(|| ServiceError::validation("participant_repo is required"))?,
            self.message_repo
                .ok_or_else(|| ServiceError::validation("message_repo is required"))?,
            self.reaction_repo
                .ok_or_else(|| ServiceError::validation("reaction_repo is required"))?,
            self.read_marker_repo
                .ok_or_else(|| ServiceError::validation("read_marker_repo is required"))?,
            self.event_bus
                .ok_or_else(|| ServiceError::validation("event_bus is required"))?,
            self.snowflake_generator
                .ok_or_else(|| ServiceError::validation("snowflake_generator is required"))?,
            self.mute_window,
            self.export_max_page_size,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
