//! `chatline whoami`: show the device's persisted user id.

use anyhow::Result;
use console::style;

use crate::state::AppState;

pub fn whoami(state: &AppState, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&state.identity)?);
        return Ok(());
    }

    println!();
    println!(
        "  {}  {}",
        style("User:").bold(),
        style(&state.identity.user_id).cyan()
    );
    println!(
        "  {}  {}",
        style("Data:").bold(),
        style(state.data_dir.display()).dim()
    );
    println!();
    Ok(())
}
