//! Main chat loop orchestration.
//!
//! Reads lines, turns them into `ChatIntent`s for the store, and renders the
//! resulting state. All conversation state lives in `ChatStore`; this loop
//! only keeps what it needs to decide what to print.

use std::io::Write;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use chatline_core::chat::history::SessionHistory;
use chatline_core::chat::notify::FailureNotifier;
use chatline_core::chat::state::{ChatIntent, DispatchOutcome, SendOutcome};
use chatline_core::chat::store::ChatStore;
use chatline_core::transport::ChatTransport;
use chatline_core::view::{ChatView, InputFormView, MessageListView, SessionPanelView};
use chatline_types::chat::{Message, Role};
use chatline_types::error::ChatError;

use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::{ChatRenderer, render_session_panel};

/// Run the interactive chat loop, optionally resuming a past session.
///
/// With `quiet`, the welcome banner and the thinking spinner are skipped,
/// as is the new-conversation hint. Replies and errors still print.
pub async fn run_chat_loop(
    state: &AppState,
    session: Option<&str>,
    quiet: bool,
) -> anyhow::Result<()> {
    let chat = state.chat.as_ref();
    let renderer = ChatRenderer::new();

    if !quiet {
        let snapshot = chat.snapshot();
        print_welcome_banner(
            &snapshot.user_id,
            &state.config.chat_url(),
            snapshot.sessions.len(),
        );
    }

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut input, mut out) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;
    state.notifier.attach(Box::new(out.clone()));

    if let Some(typed) = session {
        match select_session(chat, typed).await {
            Ok(()) => {
                let view = ChatView::from_snapshot(&chat.snapshot());
                write!(out, "{}", renderer.render_transcript(&view.messages))?;
            }
            Err(notice) => writeln!(out, "\n  {} {notice}\n", style("!").yellow().bold())?,
        }
    }

    loop {
        let text = match input.read_line().await {
            InputEvent::Eof => {
                writeln!(out, "\n  {}", style("Session ended.").dim())?;
                break;
            }
            InputEvent::Interrupted => {
                writeln!(
                    out,
                    "\n  {}",
                    style("Press Ctrl+D to exit, or keep chatting.").dim()
                )?;
                continue;
            }
            InputEvent::Line(text) => text,
        };

        if text.is_empty() {
            continue;
        }

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => write!(out, "{}", commands::help_text())?,
                ChatCommand::Clear => input.clear(),
                ChatCommand::Exit => {
                    writeln!(out, "\n  {}", style("Session ended.").dim())?;
                    break;
                }
                ChatCommand::History => {
                    let view = ChatView::from_snapshot(&chat.snapshot());
                    write!(out, "{}", renderer.render_transcript(&view.messages))?;
                }
                ChatCommand::Sessions => {
                    if let Err(e) = chat.refresh_sessions().await {
                        tracing::warn!(error = %e, "Failed to refresh session list");
                    }
                    let view = ChatView::from_snapshot(&chat.snapshot());
                    write!(out, "{}", render_session_panel(&view.sessions))?;
                }
                ChatCommand::Load(typed) => match select_session(chat, &typed).await {
                    Ok(()) => {
                        let view = ChatView::from_snapshot(&chat.snapshot());
                        write!(out, "{}", renderer.render_transcript(&view.messages))?;
                    }
                    Err(notice) => {
                        writeln!(out, "\n  {} {notice}\n", style("!").yellow().bold())?
                    }
                },
                ChatCommand::Unknown(name) => writeln!(
                    out,
                    "\n  {} Unknown command: {}. Type /help for available commands.\n",
                    style("?").yellow().bold(),
                    style(name).dim()
                )?,
            }
            continue;
        }

        let before = chat.snapshot().messages;
        let Some(outcome) = submit_line(chat, text, quiet).await else {
            continue;
        };

        match outcome {
            Ok(DispatchOutcome::Send(SendOutcome::Sent {
                conversation_id,
                new_conversation,
            })) => {
                let after = chat.snapshot().messages;
                let view = MessageListView::from_messages(reply_tail(&before, &after));
                writeln!(out)?;
                for message in &view.entries {
                    writeln!(out, "{}", renderer.render_message(message))?;
                }
                if new_conversation && !quiet {
                    writeln!(
                        out,
                        "  {}\n",
                        style(format!("Conversation {conversation_id} started")).dim()
                    )?;
                }
            }
            // The notifier already printed the failure.
            Ok(DispatchOutcome::Send(SendOutcome::Failed(_))) => {}
            Ok(DispatchOutcome::Send(SendOutcome::Skipped(reason))) => {
                debug!(?reason, "Submit skipped");
            }
            Ok(other) => debug!(?other, "Unexpected dispatch outcome"),
            Err(e) => writeln!(out, "\n  {} {e}\n", style("!").red().bold())?,
        }
    }

    input.flush();
    Ok(())
}

/// Put `text` in the input buffer and submit it if the form allows.
///
/// Returns None without dispatching when the submit control is disabled,
/// which is the case for blank input or while another send is in flight.
async fn submit_line<T, H, N>(
    chat: &ChatStore<T, H, N>,
    text: String,
    quiet: bool,
) -> Option<Result<DispatchOutcome, ChatError>>
where
    T: ChatTransport,
    H: SessionHistory,
    N: FailureNotifier,
{
    chat.update_input(text);

    let form = InputFormView::from_snapshot(&chat.snapshot());
    if !form.submit_enabled {
        debug!(label = form.submit_label, "Submit disabled");
        return None;
    }

    let spinner = thinking_spinner(quiet);
    let outcome = chat.dispatch(ChatIntent::Submit).await;
    spinner.finish_and_clear();
    Some(outcome)
}

/// Resolve a typed session id against the session list and load it.
///
/// Returns a user-facing notice when the id is unknown or the load fails.
async fn select_session<T, H, N>(chat: &ChatStore<T, H, N>, typed: &str) -> Result<(), String>
where
    T: ChatTransport,
    H: SessionHistory,
    N: FailureNotifier,
{
    if let Err(e) = chat.refresh_sessions().await {
        tracing::warn!(error = %e, "Failed to refresh session list");
    }

    let snapshot = chat.snapshot();
    let panel = SessionPanelView::new(&snapshot.sessions, snapshot.conversation_id.as_ref());
    let entry = panel
        .find(typed)
        .ok_or_else(|| format!("No conversation with id {}", typed.trim()))?;

    chat.dispatch(entry.select())
        .await
        .map(|_| ())
        .map_err(|e| format!("Could not load conversation: {e}"))
}

/// The part of `after` worth printing once a send settles.
///
/// Normally the server echoes the old transcript plus the new turn, so only
/// the reply is shown (the user's own line is already on screen). If the
/// server rewrote earlier history, the whole transcript is returned.
fn reply_tail<'a>(before: &[Message], after: &'a [Message]) -> &'a [Message] {
    if !after.starts_with(before) {
        return after;
    }
    let tail = &after[before.len()..];
    let start = tail
        .iter()
        .position(|m| m.role != Role::User)
        .unwrap_or(tail.len());
    &tail[start..]
}

fn thinking_spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatline_core::chat::history::InMemorySessionHistory;
    use chatline_core::chat::notify::LogNotifier;
    use chatline_types::chat::{ClientIdentity, ConversationId, SessionTranscript, TurnResponse};
    use chatline_types::error::TransportError;

    struct UnusedTransport;

    impl ChatTransport for UnusedTransport {
        async fn send_turn(
            &self,
            _user_id: &str,
            _message: &str,
            _conversation_id: Option<&ConversationId>,
        ) -> Result<TurnResponse, TransportError> {
            Err(TransportError::Network("not used".to_string()))
        }
    }

    fn store_with(
        transcripts: Vec<SessionTranscript>,
    ) -> ChatStore<UnusedTransport, InMemorySessionHistory, LogNotifier> {
        ChatStore::new(
            ClientIdentity {
                user_id: "user-test0001".to_string(),
            },
            UnusedTransport,
            InMemorySessionHistory::with_transcripts(transcripts),
            LogNotifier,
        )
    }

    fn transcript(id: ConversationId, messages: Vec<Message>) -> SessionTranscript {
        SessionTranscript {
            id,
            title: None,
            messages,
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_reply_tail_skips_echoed_history_and_user_line() {
        let before = vec![Message::user("hi"), Message::assistant("hello")];
        let after = vec![
            Message::user("hi"),
            Message::assistant("hello"),
            Message::user("how are you?"),
            Message::assistant("fine"),
        ];
        assert_eq!(reply_tail(&before, &after), &[Message::assistant("fine")]);
    }

    #[test]
    fn test_reply_tail_first_turn() {
        let after = vec![Message::user("hi"), Message::assistant("hello")];
        assert_eq!(reply_tail(&[], &after), &[Message::assistant("hello")]);
    }

    #[test]
    fn test_reply_tail_rewritten_history_shows_everything() {
        let before = vec![Message::user("hi")];
        let after = vec![Message::user("hello?"), Message::assistant("yes")];
        assert_eq!(reply_tail(&before, &after), after.as_slice());
    }

    #[tokio::test]
    async fn test_blank_line_is_not_submitted() {
        let chat = store_with(vec![]);

        assert!(submit_line(&chat, "   ".to_string(), true).await.is_none());
        assert!(!chat.snapshot().loading);
    }

    #[tokio::test]
    async fn test_line_is_submitted_when_form_enabled() {
        let chat = store_with(vec![]);

        let outcome = submit_line(&chat, "hi".to_string(), true).await;

        assert!(matches!(
            outcome,
            Some(Ok(DispatchOutcome::Send(SendOutcome::Failed(
                TransportError::Network(_)
            ))))
        ));
        assert_eq!(chat.snapshot().input, "hi");
        assert!(!chat.snapshot().loading);
    }

    #[tokio::test]
    async fn test_line_not_submitted_while_in_flight() {
        let chat = store_with(vec![]);
        chat.update_input("first");
        let pending = chat.begin_send().unwrap();

        assert!(submit_line(&chat, "second".to_string(), true).await.is_none());
        drop(pending);
        assert!(!chat.snapshot().loading);
    }

    #[test]
    fn test_quiet_spinner_is_hidden() {
        assert!(thinking_spinner(true).is_hidden());
    }

    #[tokio::test]
    async fn test_select_session_by_typed_numeric_id() {
        let chat = store_with(vec![transcript(
            ConversationId::Number(12),
            vec![Message::user("old")],
        )]);

        select_session(&chat, " 12 ").await.unwrap();

        let snapshot = chat.snapshot();
        assert_eq!(snapshot.conversation_id, Some(ConversationId::Number(12)));
        assert_eq!(snapshot.messages, vec![Message::user("old")]);
    }

    #[tokio::test]
    async fn test_select_unknown_session_leaves_state() {
        let chat = store_with(vec![]);

        let notice = select_session(&chat, "s9").await.unwrap_err();

        assert!(notice.contains("s9"));
        assert_eq!(chat.snapshot().conversation_id, None);
    }
}
