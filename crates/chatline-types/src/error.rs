use thiserror::Error;

use crate::chat::ConversationId;

/// Errors from a chat transport round trip.
///
/// Any variant counts as a failed turn; the state manager treats them alike.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The API answered with a non-success status.
    #[error("API error")]
    Api { status: u16 },

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    Decode(String),
}

/// Errors from durable key/value storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage read failed: {0}")]
    Read(String),

    #[error("storage write failed: {0}")]
    Write(String),

    #[error("storage data corrupt: {0}")]
    Corrupt(String),
}

/// Errors from a session history provider.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history storage error: {0}")]
    Storage(String),

    #[error("history data corrupt: {0}")]
    Corrupt(String),
}

/// Errors surfaced by conversation state operations.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("a message is still being sent")]
    Busy,

    #[error("conversation {0} not found")]
    SessionNotFound(ConversationId),

    #[error(transparent)]
    History(#[from] HistoryError),
}
