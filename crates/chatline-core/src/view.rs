//! View models for the presentation layer.
//!
//! Pure functions from a [`ChatSnapshot`] to what a front end draws: the
//! message list, the input form, and the session panel. Front ends render
//! these and send [`ChatIntent`]s back; they never touch state directly.

use chatline_types::chat::{ConversationId, Message, Role, SessionSummary};

use crate::chat::state::{ChatIntent, ChatSnapshot};

/// Shown instead of the message list when the transcript is empty.
pub const EMPTY_CHAT_PLACEHOLDER: &str = "Start the conversation!";

/// Shown instead of the session panel entries when there are none.
pub const EMPTY_SESSIONS_PLACEHOLDER: &str = "No conversations";

pub const SUBMIT_LABEL: &str = "Send";
pub const SUBMIT_LABEL_LOADING: &str = "...";

/// Short speaker label for a role.
pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "AI",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub role: Role,
    pub label: &'static str,
    pub content: String,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageListView {
    pub entries: Vec<MessageView>,
    pub placeholder: Option<&'static str>,
}

impl MessageListView {
    pub fn from_messages(messages: &[Message]) -> Self {
        let entries: Vec<MessageView> = messages
            .iter()
            .map(|m| MessageView {
                role: m.role,
                label: role_label(m.role),
                content: m.content.clone(),
                timestamp: m.timestamp.clone(),
            })
            .collect();
        let placeholder = entries.is_empty().then_some(EMPTY_CHAT_PLACEHOLDER);
        Self {
            entries,
            placeholder,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFormView {
    pub value: String,
    /// The text field is read-only while a send is in flight.
    pub input_enabled: bool,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
}

impl InputFormView {
    pub fn from_snapshot(snapshot: &ChatSnapshot) -> Self {
        Self {
            value: snapshot.input.clone(),
            input_enabled: !snapshot.loading,
            submit_enabled: snapshot.can_submit(),
            submit_label: if snapshot.loading {
                SUBMIT_LABEL_LOADING
            } else {
                SUBMIT_LABEL
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntryView {
    pub id: ConversationId,
    pub label: String,
    /// This entry is the active conversation.
    pub active: bool,
}

impl SessionEntryView {
    /// Intent emitted when the entry is picked.
    pub fn select(&self) -> ChatIntent {
        ChatIntent::SelectSession(self.id.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPanelView {
    pub entries: Vec<SessionEntryView>,
    pub placeholder: Option<&'static str>,
}

impl SessionPanelView {
    pub fn new(sessions: &[SessionSummary], active: Option<&ConversationId>) -> Self {
        let entries: Vec<SessionEntryView> = sessions
            .iter()
            .map(|s| SessionEntryView {
                id: s.id.clone(),
                label: s.label(),
                active: active == Some(&s.id),
            })
            .collect();
        let placeholder = entries.is_empty().then_some(EMPTY_SESSIONS_PLACEHOLDER);
        Self {
            entries,
            placeholder,
        }
    }

    /// Find an entry by the id text a user typed (e.g. `/load 3`).
    pub fn find(&self, typed: &str) -> Option<&SessionEntryView> {
        let typed = typed.trim();
        self.entries.iter().find(|e| e.id.to_string() == typed)
    }
}

/// Everything a front end draws for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatView {
    pub messages: MessageListView,
    pub input: InputFormView,
    pub sessions: SessionPanelView,
}

impl ChatView {
    pub fn from_snapshot(snapshot: &ChatSnapshot) -> Self {
        Self {
            messages: MessageListView::from_messages(&snapshot.messages),
            input: InputFormView::from_snapshot(snapshot),
            sessions: SessionPanelView::new(&snapshot.sessions, snapshot.conversation_id.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: ConversationId, title: Option<&str>) -> SessionSummary {
        SessionSummary {
            id,
            title: title.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_message_list_shows_placeholder() {
        let view = MessageListView::from_messages(&[]);
        assert!(view.entries.is_empty());
        assert_eq!(view.placeholder, Some(EMPTY_CHAT_PLACEHOLDER));
    }

    #[test]
    fn test_message_list_labels_roles_in_order() {
        let view = MessageListView::from_messages(&[
            Message::user("hi"),
            Message::assistant("hello").with_timestamp("2024-05-01T10:00:00"),
        ]);
        assert_eq!(view.placeholder, None);
        let labels: Vec<_> = view.entries.iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["You", "AI"]);
        assert_eq!(view.entries[1].timestamp.as_deref(), Some("2024-05-01T10:00:00"));
    }

    #[test]
    fn test_input_form_disabled_states() {
        let mut snapshot = ChatSnapshot::new("user-1".to_string());
        let form = InputFormView::from_snapshot(&snapshot);
        assert!(!form.submit_enabled);
        assert!(form.input_enabled);
        assert_eq!(form.submit_label, SUBMIT_LABEL);

        snapshot.input = "hello".to_string();
        assert!(InputFormView::from_snapshot(&snapshot).submit_enabled);

        snapshot.loading = true;
        let form = InputFormView::from_snapshot(&snapshot);
        assert!(!form.submit_enabled);
        assert!(!form.input_enabled);
        assert_eq!(form.submit_label, SUBMIT_LABEL_LOADING);
    }

    #[test]
    fn test_session_panel_highlights_active() {
        let sessions = vec![
            summary(ConversationId::Number(2), Some("Shipping")),
            summary(ConversationId::Number(1), None),
        ];
        let active = ConversationId::Number(1);
        let panel = SessionPanelView::new(&sessions, Some(&active));

        assert_eq!(panel.placeholder, None);
        assert!(!panel.entries[0].active);
        assert!(panel.entries[1].active);
        assert_eq!(panel.entries[1].label, "Session #1");
        assert_eq!(
            panel.entries[1].select(),
            ChatIntent::SelectSession(ConversationId::Number(1))
        );
    }

    #[test]
    fn test_session_panel_empty_placeholder() {
        let panel = SessionPanelView::new(&[], None);
        assert_eq!(panel.placeholder, Some(EMPTY_SESSIONS_PLACEHOLDER));
    }

    #[test]
    fn test_session_panel_find_by_typed_id() {
        let sessions = vec![
            summary(ConversationId::Number(3), None),
            summary(ConversationId::from("abc"), None),
        ];
        let panel = SessionPanelView::new(&sessions, None);
        assert_eq!(panel.find(" 3 ").unwrap().id, ConversationId::Number(3));
        assert_eq!(panel.find("abc").unwrap().id, ConversationId::from("abc"));
        assert!(panel.find("4").is_none());
    }

    #[test]
    fn test_chat_view_from_snapshot() {
        let snapshot = ChatSnapshot {
            user_id: "user-1".to_string(),
            messages: vec![Message::user("hi")],
            input: String::new(),
            conversation_id: Some(ConversationId::from("c1")),
            loading: false,
            sessions: vec![summary(ConversationId::from("c1"), Some("hi"))],
            loaded_session: None,
        };
        let view = ChatView::from_snapshot(&snapshot);
        assert_eq!(view.messages.entries.len(), 1);
        assert!(!view.input.submit_enabled);
        assert!(view.sessions.entries[0].active);
    }
}
