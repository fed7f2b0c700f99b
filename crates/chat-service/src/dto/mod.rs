//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Commands and request DTOs with validation
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    AddParticipantsCommand, AddReactionCommand, ChatListFilter, CreateChatCommand,
    DeleteMessageCommand, ExportChatCommand, ForwardBatchCommand, ForwardMessageCommand,
    ListMessagesQuery, MuteChatCommand, SearchMessagesCommand, SendMessageCommand, TypingRequest,
    UpdateReactionCommand, UpdateStatusRequest,
};

pub use responses::{
    ChatResponse, ExportResponse, HealthChecks, HealthResponse, MessageResponse,
    PaginatedResponse, PaginationMeta, ParticipantResponse, PresenceResponse, ReactionResponse,
    ReadMarkerResponse, ReadinessResponse, SearchResultResponse, UserResponse,
};
