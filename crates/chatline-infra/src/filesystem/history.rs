//! JSON-file session history.
//!
//! `FileSessionHistory` implements [`SessionHistory`] over a JSON array of
//! transcripts, most recently active first, so past conversations survive a
//! restart of the client.

use std::path::PathBuf;

use tokio::sync::Mutex;

use chatline_core::chat::history::{SessionHistory, upsert_transcript};
use chatline_types::chat::{ConversationId, Message, SessionSummary, SessionTranscript};
use chatline_types::error::HistoryError;

use super::{read_optional, write_atomic};

/// Transcripts kept on disk; the least recently active are dropped first.
const MAX_TRANSCRIPTS: usize = 200;

/// File-backed [`SessionHistory`].
///
/// `write_lock` serializes writers within this process only. Another client
/// process writing the same file can still lose a concurrent update.
pub struct FileSessionHistory {
    path: PathBuf,
    write_lock: Mutex<()>,
    max_transcripts: usize,
}

impl FileSessionHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            max_transcripts: MAX_TRANSCRIPTS,
        }
    }

    async fn read_all(&self) -> Result<Vec<SessionTranscript>, HistoryError> {
        let content = read_optional(&self.path)
            .await
            .map_err(|e| HistoryError::Storage(format!("{}: {e}", self.path.display())))?;

        match content {
            Some(content) if !content.trim().is_empty() => serde_json::from_str(&content)
                .map_err(|e| HistoryError::Corrupt(format!("{}: {e}", self.path.display()))),
            _ => Ok(Vec::new()),
        }
    }
}

impl SessionHistory for FileSessionHistory {
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, HistoryError> {
        let transcripts = self.read_all().await?;
        Ok(transcripts.iter().map(SessionTranscript::summary).collect())
    }

    async fn load_transcript(
        &self,
        id: &ConversationId,
    ) -> Result<Option<Vec<Message>>, HistoryError> {
        let transcripts = self.read_all().await?;
        Ok(transcripts
            .into_iter()
            .find(|t| &t.id == id)
            .map(|t| t.messages))
    }

    async fn record_transcript(
        &self,
        id: &ConversationId,
        messages: &[Message],
    ) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock().await;

        let mut transcripts = self.read_all().await?;
        upsert_transcript(&mut transcripts, id, messages);
        if transcripts.len() > self.max_transcripts {
            tracing::debug!(
                dropped = transcripts.len() - self.max_transcripts,
                "Dropping oldest transcripts"
            );
            transcripts.truncate(self.max_transcripts);
        }

        let content = serde_json::to_string_pretty(&transcripts)
            .map_err(|e| HistoryError::Storage(e.to_string()))?;
        write_atomic(&self.path, &content)
            .await
            .map_err(|e| HistoryError::Storage(format!("{}: {e}", self.path.display())))?;

        tracing::debug!(conversation_id = %id, messages = messages.len(), "Transcript recorded");
        Ok(())
    }
}
