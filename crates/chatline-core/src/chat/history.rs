//! SessionHistory trait definition and in-memory implementation.
//!
//! A session history provider keeps the transcripts of past conversations so
//! the user can list them and switch back to one. Follows the same RPITIT
//! pattern as the other ports.

use std::sync::RwLock;

use chrono::Utc;

use chatline_types::chat::{ConversationId, Message, Role, SessionSummary, SessionTranscript};
use chatline_types::error::HistoryError;

/// Maximum characters in a derived session title, ellipsis included.
const MAX_TITLE_CHARS: usize = 40;

/// Provider of past conversation sessions.
///
/// Implementations live in this module (`InMemorySessionHistory`) and in
/// chatline-infra (`FileSessionHistory`).
pub trait SessionHistory: Send + Sync {
    /// List known sessions, most recently active first.
    fn list_sessions(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<SessionSummary>, HistoryError>> + Send;

    /// Get the stored transcript of a session, or None if the id is unknown.
    fn load_transcript(
        &self,
        id: &ConversationId,
    ) -> impl std::future::Future<Output = Result<Option<Vec<Message>>, HistoryError>> + Send;

    /// Store the authoritative transcript of a session (upsert).
    ///
    /// The session becomes the most recently active one.
    fn record_transcript(
        &self,
        id: &ConversationId,
        messages: &[Message],
    ) -> impl std::future::Future<Output = Result<(), HistoryError>> + Send;
}

/// Derive a session title from the first user message.
///
/// Returns None when the transcript has no non-blank user message.
pub fn derive_title(messages: &[Message]) -> Option<String> {
    let first = messages
        .iter()
        .find(|m| m.role == Role::User && !m.content.trim().is_empty())?;
    let text = first.content.split_whitespace().collect::<Vec<_>>().join(" ");

    if text.chars().count() <= MAX_TITLE_CHARS {
        return Some(text);
    }
    let cut: String = text.chars().take(MAX_TITLE_CHARS - 1).collect();
    Some(format!("{}\u{2026}", cut.trim_end()))
}

/// Upsert a transcript into a recency-ordered list (most recent first).
///
/// An existing title is kept; a missing one is derived from the messages.
pub fn upsert_transcript(
    transcripts: &mut Vec<SessionTranscript>,
    id: &ConversationId,
    messages: &[Message],
) {
    let existing_title = transcripts
        .iter()
        .position(|t| &t.id == id)
        .and_then(|pos| transcripts.remove(pos).title);

    transcripts.insert(
        0,
        SessionTranscript {
            id: id.clone(),
            title: existing_title.or_else(|| derive_title(messages)),
            messages: messages.to_vec(),
            updated_at: Utc::now(),
        },
    );
}

/// Process-local [`SessionHistory`].
#[derive(Debug, Default)]
pub struct InMemorySessionHistory {
    transcripts: RwLock<Vec<SessionTranscript>>,
}

impl InMemorySessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History seeded with transcripts, listed in the given order.
    pub fn with_transcripts(transcripts: Vec<SessionTranscript>) -> Self {
        Self {
            transcripts: RwLock::new(transcripts),
        }
    }
}

impl SessionHistory for InMemorySessionHistory {
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, HistoryError> {
        let transcripts = self
            .transcripts
            .read()
            .map_err(|e| HistoryError::Storage(e.to_string()))?;
        Ok(transcripts.iter().map(SessionTranscript::summary).collect())
    }

    async fn load_transcript(
        &self,
        id: &ConversationId,
    ) -> Result<Option<Vec<Message>>, HistoryError> {
        let transcripts = self
            .transcripts
            .read()
            .map_err(|e| HistoryError::Storage(e.to_string()))?;
        Ok(transcripts
            .iter()
            .find(|t| &t.id == id)
            .map(|t| t.messages.clone()))
    }

    async fn record_transcript(
        &self,
        id: &ConversationId,
        messages: &[Message],
    ) -> Result<(), HistoryError> {
        let mut transcripts = self
            .transcripts
            .write()
            .map_err(|e| HistoryError::Storage(e.to_string()))?;
        upsert_transcript(&mut transcripts, id, messages);
        Ok(())
    }
}
