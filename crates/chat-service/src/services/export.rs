//! Transcript export
//!
//! Renders a window of a chat's visible history as JSON, CSV or plain text.

use std::fmt::Write as _;
use std::str::FromStr;

use chat_core::entities::{Message, User};
use chat_core::traits::TranscriptQuery;
use chat_core::{ExportFormat, Snowflake};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use crate::dto::{ExportChatCommand, ExportResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::guard::ParticipantGuard;
use super::page_offset;

const CSV_HEADER: &str = "id,created_at,sender_id,sender_name,type,content,blob_ref";

pub struct ExportService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ExportService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Export the caller's view of a chat, oldest first
    ///
    /// `from` and `to` are inclusive. Pages are bounded by the configured
    /// export page size.
    #[instrument(skip(self, cmd), fields(format = %cmd.format, page = cmd.page))]
    pub async fn export(
        &self,
        chat_id: Snowflake,
        caller: Snowflake,
        cmd: ExportChatCommand,
    ) -> ServiceResult<ExportResponse> {
        ParticipantGuard::new(self.ctx)
            .require_participant(chat_id, caller)
            .await?;

        let format = ExportFormat::from_str(&cmd.format)?;
        if let (Some(from), Some(to)) = (cmd.from, cmd.to) {
            if from > to {
                return Err(ServiceError::validation("from must not be after to"));
            }
        }
        if cmd.page < 1 {
            return Err(ServiceError::validation("page starts at 1"));
        }
        let max = self.ctx.export_max_page_size();
        if cmd.per_page < 1 || cmd.per_page > max {
            return Err(ServiceError::validation(format!(
                "per_page must be between 1 and {max}"
            )));
        }
        let offset = page_offset(cmd.page, cmd.per_page)?;

        let messages = self
            .ctx
            .message_repo()
            .find_transcript(
                chat_id,
                caller,
                TranscriptQuery {
                    from: cmd.from,
                    to: cmd.to,
                    offset,
                    limit: cmd.per_page,
                },
            )
            .await?;

        let mut sender_ids: Vec<_> = messages.iter().map(|m| m.sender_id).collect();
        sender_ids.sort_unstable();
        sender_ids.dedup();
        let senders = self.ctx.user_repo().find_by_ids(&sender_ids).await?;

        let rows: Vec<TranscriptRow<'_>> = messages
            .iter()
            .map(|m| TranscriptRow::new(m, &senders))
            .collect();

        let body = match format {
            ExportFormat::Json => serde_json::to_string_pretty(&rows)
                .map_err(|e| ServiceError::internal(format!("Transcript encoding failed: {e}")))?,
            ExportFormat::Csv => render_csv(&rows),
            ExportFormat::Txt => render_txt(&rows),
        };

        info!(chat_id = %chat_id, messages = rows.len(), "Transcript exported");

        Ok(ExportResponse {
            content_type: format.content_type(),
            filename: format!("chat-{}.{}", chat_id, format.extension()),
            body,
            message_count: rows.len(),
        })
    }
}

#[derive(Debug, Serialize)]
struct TranscriptRow<'a> {
    id: String,
    sender_id: String,
    sender_name: &'a str,
    #[serde(rename = "type")]
    message_type: &'static str,
    content: &'a str,
    blob_ref: Option<&'a str>,
    reply_to: Option<String>,
    forwarded_from: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(skip)]
    text: bool,
}

impl<'a> TranscriptRow<'a> {
    fn new(message: &'a Message, senders: &'a [User]) -> Self {
        let sender_name = senders
            .iter()
            .find(|u| u.id == message.sender_id)
            .map_or("unknown", User::name);
        Self {
            id: message.id.to_string(),
            sender_id: message.sender_id.to_string(),
            sender_name,
            message_type: message.message_type.as_str(),
            content: &message.content,
            blob_ref: message.blob_ref.as_deref(),
            reply_to: message.reply_to.map(|id| id.to_string()),
            forwarded_from: message.forwarded_from.map(|id| id.to_string()),
            created_at: message.created_at,
            text: message.is_text(),
        }
    }
}

fn render_csv(rows: &[TranscriptRow<'_>]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push_str("\r\n");
    for row in rows {
        let created_at = row.created_at.to_rfc3339();
        let fields = [
            row.id.as_str(),
            created_at.as_str(),
            row.sender_id.as_str(),
            row.sender_name,
            row.message_type,
            row.content,
            row.blob_ref.unwrap_or(""),
        ];
        let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        out.push_str(&line.join(","));
        out.push_str("\r\n");
    }
    out
}

/// Quote a field when it holds a delimiter, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn render_txt(rows: &[TranscriptRow<'_>]) -> String {
    let mut out = String::new();
    for row in rows {
        let stamp = row.created_at.format("%Y-%m-%d %H:%M:%S");
        if row.text {
            let _ = writeln!(out, "[{stamp}] {}: {}", row.sender_name, row.content);
        } else {
            let _ = writeln!(
                out,
                "[{stamp}] {}: <{}: {}>",
                row.sender_name,
                row.message_type,
                row.blob_ref.unwrap_or("")
            );
        }
    }
    out
}
