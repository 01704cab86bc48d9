//! `chatline sessions`: list past conversations.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use chatline_core::view::{SessionEntryView, SessionPanelView};

use crate::state::AppState;

/// Print the session list as a table, or as JSON.
///
/// # Examples
///
/// ```bash
/// chatline sessions
/// chatline sessions --json
/// ```
pub async fn list_sessions(state: &AppState, json: bool) -> Result<()> {
    state.chat.refresh_sessions().await?;
    let snapshot = state.chat.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot.sessions)?);
        return Ok(());
    }

    let panel = SessionPanelView::new(&snapshot.sessions, None);
    if let Some(placeholder) = panel.placeholder {
        println!();
        println!(
            "  {} {placeholder}. Start one with: {}",
            style("i").blue().bold(),
            style("chatline chat").yellow()
        );
        println!();
        return Ok(());
    }

    println!("{}", sessions_table(&panel.entries));
    println!(
        "  {}",
        style("Resume with: chatline chat --session <id>").dim()
    );
    Ok(())
}

fn sessions_table(entries: &[SessionEntryView]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Conversation").fg(Color::White),
    ]);

    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.id.to_string()).fg(Color::Cyan),
            Cell::new(&entry.label),
        ]);
    }
    table
}
