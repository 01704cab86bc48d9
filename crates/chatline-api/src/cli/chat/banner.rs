//! Welcome banner display for chat sessions.

use console::style;

/// Print the welcome banner at the start of a chat.
///
/// Shows the device's user id, the chat endpoint, and how many past sessions
/// are available to `/load`.
pub fn print_welcome_banner(user_id: &str, endpoint: &str, session_count: usize) {
    println!();
    println!("  {} {}", style("*").cyan(), style("Chatline").cyan().bold());
    println!();
    println!("  {}     {}", style("User:").bold(), style(user_id).dim());
    println!("  {} {}", style("Endpoint:").bold(), style(endpoint).dim());
    println!(
        "  {} {}",
        style("Sessions:").bold(),
        style(session_count).dim()
    );
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
