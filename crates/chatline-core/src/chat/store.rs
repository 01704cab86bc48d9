//! Conversation state manager.
//!
//! `ChatStore` owns the transcript, the input buffer, the active conversation
//! id, the in-flight flag, and the session list. It reconciles them with the
//! chat API one turn at a time:
//!
//! ```text
//! Idle --send_message (input non-empty)--> Sending --ok--> Idle [transcript replaced]
//!                                           Sending --err--> Idle [unchanged, notified]
//! ```
//!
//! State lives in a `watch` channel. Every mutation is a single atomic
//! modification that publishes a new [`ChatSnapshot`] to subscribers, and no
//! lock is ever held across an `.await`.

use tokio::sync::watch;
use tracing::{debug, info, warn};

use chatline_types::chat::{ClientIdentity, ConversationId, TurnResponse};
use chatline_types::error::{ChatError, TransportError};

use crate::chat::history::SessionHistory;
use crate::chat::notify::FailureNotifier;
use crate::chat::state::{ChatIntent, ChatSnapshot, DispatchOutcome, SendOutcome, SkipReason};
use crate::transport::ChatTransport;

/// Conversation state manager.
///
/// Generic over its collaborators so the application decides which transport,
/// history provider, and notifier to wire in.
pub struct ChatStore<T: ChatTransport, H: SessionHistory, N: FailureNotifier> {
    transport: T,
    history: H,
    notifier: N,
    state: watch::Sender<ChatSnapshot>,
}

/// A turn that passed the send preconditions and holds the in-flight flag.
///
/// Dropping it, whether after completion or on cancellation, clears the flag.
pub struct PendingTurn<'a> {
    pub user_id: String,
    pub message: String,
    pub conversation_id: Option<ConversationId>,
    _loading: LoadingGuard<'a>,
}

/// Clears `loading` when dropped.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<ChatSnapshot>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| std::mem::replace(&mut s.loading, false));
    }
}

impl<T: ChatTransport, H: SessionHistory, N: FailureNotifier> ChatStore<T, H, N> {
    /// Create a store for an already resolved identity.
    pub fn new(identity: ClientIdentity, transport: T, history: H, notifier: N) -> Self {
        let (state, _) = watch::channel(ChatSnapshot::new(identity.user_id));
        Self {
            transport,
            history,
            notifier,
            state,
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ChatSnapshot {
        self.state.borrow().clone()
    }

    /// Receive a notification on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ChatSnapshot> {
        self.state.subscribe()
    }

    /// Load the initial session list.
    pub async fn mount(&self) -> Result<(), ChatError> {
        self.refresh_sessions().await
    }

    /// Replace the input buffer.
    pub fn update_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_if_modified(|s| {
            if s.input == text {
                return false;
            }
            s.input = text;
            true
        });
    }

    /// Send the current input as one turn.
    ///
    /// A no-op (`Skipped`) when the input is blank or another send is in
    /// flight. On failure the user is notified and state is left untouched.
    /// `loading` is false again once this returns, whatever the outcome.
    pub async fn send_message(&self) -> SendOutcome {
        let pending = match self.begin_send() {
            Ok(pending) => pending,
            Err(reason) => {
                debug!(?reason, "Send skipped");
                return SendOutcome::Skipped(reason);
            }
        };

        let result = self
            .transport
            .send_turn(
                &pending.user_id,
                &pending.message,
                pending.conversation_id.as_ref(),
            )
            .await;

        self.complete_send(pending, result).await
    }

    /// Check the send preconditions and, if they hold, raise the in-flight flag.
    ///
    /// The check and the flag flip happen in one atomic modification, so two
    /// concurrent callers can never both get a [`PendingTurn`].
    pub fn begin_send(&self) -> Result<PendingTurn<'_>, SkipReason> {
        let mut draft = Err(SkipReason::InFlight);
        self.state.send_if_modified(|s| {
            if s.loading {
                return false;
            }
            if s.input.trim().is_empty() {
                draft = Err(SkipReason::EmptyInput);
                return false;
            }
            s.loading = true;
            draft = Ok((s.user_id.clone(), s.input.clone(), s.conversation_id.clone()));
            true
        });

        let (user_id, message, conversation_id) = draft?;
        Ok(PendingTurn {
            user_id,
            message,
            conversation_id,
            _loading: LoadingGuard { state: &self.state },
        })
    }

    /// Apply the outcome of a turn started with [`ChatStore::begin_send`].
    ///
    /// Success replaces the transcript wholesale with the server's and clears
    /// the input, then records it with the history provider. Failure changes
    /// nothing but notifies the user. The in-flight flag is released when
    /// `pending` drops at the end.
    ///
    /// The server transcript is published before any history I/O, so a
    /// history failure or a cancellation during recording never loses it.
    pub async fn complete_send(
        &self,
        pending: PendingTurn<'_>,
        result: Result<TurnResponse, TransportError>,
    ) -> SendOutcome {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    conversation_id = ?pending.conversation_id,
                    error = %e,
                    "Failed to send message"
                );
                self.notifier
                    .notify_failure(&format!("Failed to send message: {e}"));
                return SendOutcome::Failed(e);
            }
        };

        let TurnResponse {
            conversation_id,
            messages,
        } = response;
        let new_conversation = pending.conversation_id.as_ref() != Some(&conversation_id);

        self.state.send_modify(|s| {
            s.conversation_id = Some(conversation_id.clone());
            s.messages = messages.clone();
            s.input.clear();
        });

        if let Err(e) = self.history.record_transcript(&conversation_id, &messages).await {
            warn!(conversation_id = %conversation_id, error = %e, "Failed to record transcript");
        }

        if new_conversation {
            info!(conversation_id = %conversation_id, "Conversation assigned");
            if let Err(e) = self.refresh_sessions().await {
                warn!(error = %e, "Failed to refresh session list");
            }
        }

        drop(pending);
        SendOutcome::Sent {
            conversation_id,
            new_conversation,
        }
    }

    /// Switch to a past session, replacing the active conversation wholesale.
    ///
    /// Refused with [`ChatError::Busy`] while a send is in flight. The session
    /// list itself is not modified.
    pub async fn load_session(&self, id: &ConversationId) -> Result<(), ChatError> {
        if self.state.borrow().loading {
            return Err(ChatError::Busy);
        }

        let messages = self
            .history
            .load_transcript(id)
            .await?
            .ok_or_else(|| ChatError::SessionNotFound(id.clone()))?;

        // A send may have started while the transcript was loading.
        let mut applied = false;
        self.state.send_if_modified(|s| {
            if s.loading {
                return false;
            }
            s.conversation_id = Some(id.clone());
            s.loaded_session = Some(id.clone());
            s.messages = messages;
            applied = true;
            true
        });
        if !applied {
            return Err(ChatError::Busy);
        }

        info!(conversation_id = %id, "Session loaded");
        Ok(())
    }

    /// Re-read the session list from the history provider.
    pub async fn refresh_sessions(&self) -> Result<(), ChatError> {
        let sessions = self.history.list_sessions().await?;
        debug!(count = sessions.len(), "Session list refreshed");
        self.state.send_modify(|s| s.sessions = sessions);
        Ok(())
    }

    /// Route a presentation intent to the matching operation.
    pub async fn dispatch(&self, intent: ChatIntent) -> Result<DispatchOutcome, ChatError> {
        match intent {
            ChatIntent::EditInput(text) => {
                self.update_input(text);
                Ok(DispatchOutcome::InputUpdated)
            }
            ChatIntent::Submit => Ok(DispatchOutcome::Send(self.send_message().await)),
            ChatIntent::SelectSession(id) => {
                self.load_session(&id).await?;
                Ok(DispatchOutcome::SessionLoaded(id))
            }
        }
    }
}
