//! Conversation, message, and session summary types for Chatline.
//!
//! These types model what the chat API sends back and what the client keeps
//! between turns: ordered transcripts, conversation identifiers, and the
//! summaries shown in the session picker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;

/// Author of a message in a conversation.
///
/// The chat backend labels assistant turns `"ai"`; that spelling is accepted
/// on input and normalized to `assistant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[serde(alias = "ai")]
    Assistant,
}

/// A single message in a conversation transcript.
///
/// Messages are never edited after creation. Order within a transcript is
/// display order and is owned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: None,
        }
    }

    /// Attach the server-side timestamp string.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }
}

/// Server-assigned identifier of a conversation.
///
/// Backends issue either integer or string ids. The id is echoed back in the
/// same JSON form it arrived in, so an integer id stays an integer on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConversationId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationId::Number(n) => write!(f, "{n}"),
            ConversationId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for ConversationId {
    fn from(s: &str) -> Self {
        ConversationId::Text(s.to_string())
    }
}

/// A past conversation as listed in the session picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: ConversationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl SessionSummary {
    /// Title to display, falling back to `Session #<id>`.
    pub fn label(&self) -> String {
        match &self.title {
            Some(title) if !title.trim().is_empty() => title.clone(),
            _ => format!("Session #{}", self.id),
        }
    }
}

/// A stored conversation transcript, as kept by a session history provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTranscript {
    pub id: ConversationId,
    pub title: Option<String>,
    pub messages: Vec<Message>,
    pub updated_at: DateTime<Utc>,
}

impl SessionTranscript {
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            title: self.title.clone(),
        }
    }
}

/// The per-device identity sent with every turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    pub user_id: String,
}

/// Request body for one conversation turn.
///
/// `conversation_id` is serialized as `null` when absent; the server starts a
/// new conversation in that case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRequest {
    pub user_id: String,
    pub message: String,
    pub conversation_id: Option<ConversationId>,
}

/// Successful response body for one conversation turn.
///
/// `messages` is the full, authoritative transcript of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResponse {
    pub conversation_id: ConversationId,
    pub messages: Vec<Message>,
}
