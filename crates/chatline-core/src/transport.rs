//! ChatTransport trait definition.
//!
//! The outbound side of a conversation turn: one user message goes out, the
//! full authoritative transcript comes back. Implementations live in
//! chatline-infra (e.g., `HttpChatTransport`).

use chatline_types::chat::{ConversationId, TurnResponse};
use chatline_types::error::TransportError;

/// Trait for chat API backends.
///
/// Each call issues exactly one request. Implementations do not retry and do
/// not serialize concurrent calls; the state manager guarantees at most one
/// call is outstanding.
pub trait ChatTransport: Send + Sync {
    /// Send one user message and receive the conversation transcript.
    ///
    /// `message` is non-empty after trimming (caller's precondition).
    /// `conversation_id` of `None` asks the server to start a new conversation.
    fn send_turn(
        &self,
        user_id: &str,
        message: &str,
        conversation_id: Option<&ConversationId>,
    ) -> impl std::future::Future<Output = Result<TurnResponse, TransportError>> + Send;
}
