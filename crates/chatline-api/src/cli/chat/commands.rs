//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and provide in-chat controls for help, the
//! transcript, and switching between past sessions.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat.
    Exit,
    /// Re-render the current transcript.
    History,
    /// Show the session panel.
    Sessions,
    /// Switch to a past session by id.
    Load(String),
    /// Unknown or malformed command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd.to_lowercase(), arg.trim()),
        None => (trimmed.to_lowercase(), ""),
    };

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/history" => Some(ChatCommand::History),
        "/sessions" | "/ls" => Some(ChatCommand::Sessions),
        "/load" => {
            if arg.is_empty() {
                Some(ChatCommand::Unknown("/load requires a session id".to_string()))
            } else {
                Some(ChatCommand::Load(arg.to_string()))
            }
        }
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Help text listing all available commands.
pub fn help_text() -> String {
    let rows = [
        ("/help", "Show this help message"),
        ("/clear", "Clear the screen"),
        ("/exit", "End the chat"),
        ("/history", "Show the current conversation"),
        ("/sessions", "List past conversations"),
        ("/load <id>", "Switch to a past conversation"),
    ];

    let mut out = format!("\n  {}\n\n", style("Available commands:").bold());
    for (cmd, description) in rows {
        out.push_str(&format!("  {}  {description}\n", style(format!("{cmd:<10}")).cyan()));
    }
    out.push_str(&format!(
        "\n  {}\n",
        style("Ctrl+D to exit. Ctrl+C does not discard a pending reply.").dim()
    ));
    out
}
