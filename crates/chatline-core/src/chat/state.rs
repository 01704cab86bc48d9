//! Observable chat state and the outcomes of state operations.

use chatline_types::chat::{ConversationId, Message, SessionSummary};
use chatline_types::error::TransportError;

/// Immutable copy of everything the presentation layer may observe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatSnapshot {
    pub user_id: String,
    /// Current transcript, in display order.
    pub messages: Vec<Message>,
    /// Text typed but not yet sent.
    pub input: String,
    /// None until the server assigns an id or a session is loaded.
    pub conversation_id: Option<ConversationId>,
    /// True exactly while a send round trip is outstanding.
    pub loading: bool,
    pub sessions: Vec<SessionSummary>,
    /// Session most recently loaded from history, if any.
    pub loaded_session: Option<ConversationId>,
}

impl ChatSnapshot {
    pub fn new(user_id: String) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }

    /// Whether a submit would be accepted right now.
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.input.trim().is_empty()
    }
}

/// Why a send was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Input is empty or whitespace-only.
    EmptyInput,
    /// Another send is still in flight.
    InFlight,
}

/// Result of a `send_message` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The server accepted the turn and its transcript is now current.
    Sent {
        conversation_id: ConversationId,
        /// The server assigned an id the client did not have before.
        new_conversation: bool,
    },
    /// The round trip failed; state is unchanged.
    Failed(TransportError),
    /// Preconditions did not hold; no request was issued.
    Skipped(SkipReason),
}

/// What the presentation layer asks the state manager to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatIntent {
    EditInput(String),
    Submit,
    SelectSession(ConversationId),
}

/// Result of dispatching a [`ChatIntent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    InputUpdated,
    Send(SendOutcome),
    SessionLoaded(ConversationId),
}
