//! Terminal rendering of the chat view models.
//!
//! `ChatRenderer` turns [`MessageListView`] and [`SessionPanelView`] into
//! styled terminal text. Assistant replies are rendered as markdown through
//! `termimad`, with fenced code blocks highlighted by `syntect`; user
//! messages are shown as typed.

use console::style;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;
use termimad::crossterm::style::Color;

use chatline_core::view::{MessageListView, MessageView, SessionEntryView, SessionPanelView};
use chatline_types::chat::Role;

const CODE_THEME: &str = "base16-ocean.dark";

/// Terminal markdown renderer with syntax highlighting.
pub struct ChatRenderer {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Cyan);
        skin.headers[0].set_fg(Color::Cyan);
        skin.headers[1].set_fg(Color::Cyan);
        skin.inline_code.set_fg(Color::Yellow);

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Render markdown with syntax-highlighted code fences.
    pub fn render_markdown(&self, markdown: &str) -> String {
        let mut output = String::new();
        let mut in_code_block = false;
        let mut code_lang = String::new();
        let mut code_buf = String::new();

        for line in markdown.lines() {
            if line.starts_with("```") {
                if in_code_block {
                    in_code_block = false;
                    output.push_str(&self.highlight_code(&code_buf, &code_lang));
                } else {
                    in_code_block = true;
                    code_lang = line.trim_start_matches('`').trim().to_string();
                    code_buf.clear();
                }
            } else if in_code_block {
                code_buf.push_str(line);
                code_buf.push('\n');
            } else {
                output.push_str(&self.skin.term_text(line).to_string());
            }
        }

        // Unterminated fence: still show the code.
        if in_code_block && !code_buf.is_empty() {
            output.push_str(&self.highlight_code(&code_buf, &code_lang));
        }

        output
    }

    /// Render one message with its speaker label.
    pub fn render_message(&self, message: &MessageView) -> String {
        let label = match message.role {
            Role::User => style(message.label).green().bold(),
            Role::Assistant => style(message.label).cyan().bold(),
        };
        let header = match &message.timestamp {
            Some(ts) => format!("  {label} {}", style(ts).dim()),
            None => format!("  {label}"),
        };

        let body = match message.role {
            Role::User => indent(&message.content),
            Role::Assistant => indent(self.render_markdown(&message.content).trim_end()),
        };

        format!("{header}\n{body}\n")
    }

    /// Render a whole transcript, or its placeholder when empty.
    pub fn render_transcript(&self, view: &MessageListView) -> String {
        if let Some(placeholder) = view.placeholder {
            return format!("\n  {}\n", style(placeholder).dim());
        }

        let mut out = String::from("\n");
        for message in &view.entries {
            out.push_str(&self.render_message(message));
            out.push('\n');
        }
        out
    }

    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = if lang.is_empty() {
            self.syntax_set.find_syntax_plain_text()
        } else {
            self.syntax_set
                .find_syntax_by_token(lang)
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
        };
        let label = if lang.is_empty() { "text" } else { lang };

        let mut output = format!("{}\n", style(format!("--- {label} ---")).dim());

        let Some(theme) = self.theme_set.themes.get(CODE_THEME) else {
            output.push_str(code);
            return output;
        };
        let mut h = HighlightLines::new(syntax, theme);

        for line in code.lines() {
            let ranges: Vec<(Style, &str)> = h
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&format!("{escaped}\x1b[0m\n"));
        }

        output
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// One session panel line; the active conversation is marked.
pub fn session_line(entry: &SessionEntryView) -> String {
    if entry.active {
        format!(
            "  {} {} {}",
            style("*").green().bold(),
            style(&entry.label).green().bold(),
            style(format!("({})", entry.id)).dim()
        )
    } else {
        format!(
            "    {} {}",
            entry.label,
            style(format!("({})", entry.id)).dim()
        )
    }
}

/// Render the session panel, or its placeholder when empty.
pub fn render_session_panel(panel: &SessionPanelView) -> String {
    if let Some(placeholder) = panel.placeholder {
        return format!("\n  {}\n", style(placeholder).dim());
    }

    let mut out = format!("\n  {}\n\n", style("Conversations:").bold());
    for entry in &panel.entries {
        out.push_str(&session_line(entry));
        out.push('\n');
    }
    out.push_str(&format!(
        "\n  {}\n",
        style("Switch with /load <id>").dim()
    ));
    out
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatline_core::view::{EMPTY_CHAT_PLACEHOLDER, EMPTY_SESSIONS_PLACEHOLDER};
    use chatline_types::chat::{ConversationId, Message, SessionSummary};

    #[test]
    fn test_empty_transcript_shows_placeholder() {
        let renderer = ChatRenderer::new();
        let out = renderer.render_transcript(&MessageListView::from_messages(&[]));
        assert!(out.contains(EMPTY_CHAT_PLACEHOLDER));
    }

    #[test]
    fn test_transcript_labels_both_roles() {
        let renderer = ChatRenderer::new();
        let view = MessageListView::from_messages(&[
            Message::user("Where is my order?"),
            Message::assistant("It shipped yesterday."),
        ]);
        let out = renderer.render_transcript(&view);

        let you = out.find("You").unwrap();
        let ai = out.find("AI").unwrap();
        assert!(you < ai);
        assert!(out.contains("Where is my order?"));
    }

    #[test]
    fn test_code_fence_is_highlighted_with_header() {
        let renderer = ChatRenderer::new();
        let out = renderer.render_markdown("Try this:\n```\nhello world\n```\n");
        assert!(out.contains("--- text ---"));
        assert!(out.contains("hello world"));
    }

    #[test]
    fn test_unterminated_fence_still_renders_code() {
        let renderer = ChatRenderer::new();
        let out = renderer.render_markdown("```\nlet x = 1;\n");
        assert!(out.contains("let x = 1;"));
    }

    #[test]
    fn test_session_panel_marks_active() {
        let sessions = vec![
            SessionSummary {
                id: ConversationId::Number(2),
                title: Some("Shipping".to_string()),
            },
            SessionSummary {
                id: ConversationId::Number(1),
                title: None,
            },
        ];
        let active = ConversationId::Number(2);
        let panel = SessionPanelView::new(&sessions, Some(&active));

        assert!(session_line(&panel.entries[0]).contains('*'));
        assert!(!session_line(&panel.entries[1]).contains('*'));

        let out = render_session_panel(&panel);
        assert!(out.contains("Shipping"));
        assert!(out.contains("Session #1"));
    }

    #[test]
    fn test_empty_session_panel_placeholder() {
        let out = render_session_panel(&SessionPanelView::new(&[], None));
        assert!(out.contains(EMPTY_SESSIONS_PLACEHOLDER));
    }
}
