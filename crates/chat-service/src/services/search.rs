//! Message search
//!
//! Case-insensitive substring search over the caller's chats, ranked by how
//! often the term occurs in a message.

use chat_core::traits::MessageSearch;
use chat_core::{SearchTerm, Snowflake};
use tracing::{debug, instrument};

use crate::dto::{PaginatedResponse, SearchMessagesCommand, SearchResultResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::guard::ParticipantGuard;
use super::page_offset;

pub struct SearchService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SearchService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Search messages visible to `caller`
    ///
    /// Ranked by occurrence count, then newest first. With `chat_id` the
    /// search is scoped to that chat and the caller must belong to it.
    #[instrument(skip(self, cmd), fields(chat_id = ?cmd.chat_id, page = cmd.page))]
    pub async fn search(
        &self,
        caller: Snowflake,
        cmd: SearchMessagesCommand,
    ) -> ServiceResult<PaginatedResponse<SearchResultResponse>> {
        let term = SearchTerm::new(&cmd.q)?;
        if cmd.page < 1 {
            return Err(ServiceError::validation("page starts at 1"));
        }
        if !(1..=100).contains(&cmd.per_page) {
            return Err(ServiceError::validation("per_page must be 1-100"));
        }
        let offset = page_offset(cmd.page, cmd.per_page)?;

        if let Some(chat_id) = cmd.chat_id {
            ParticipantGuard::new(self.ctx)
                .require_participant(chat_id, caller)
                .await?;
        }

        let hits = self
            .ctx
            .message_repo()
            .search(MessageSearch {
                viewer: caller,
                term: &term,
                chat_id: cmd.chat_id,
                offset,
                limit: cmd.per_page + 1,
            })
            .await?;

        debug!(hits = hits.len(), "Search executed");

        Ok(PaginatedResponse::from_lookahead(
            hits.into_iter().map(SearchResultResponse::from).collect(),
            cmd.page,
            cmd.per_page,
        ))
    }
}
