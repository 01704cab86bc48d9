//! Interactive terminal chat.
//!
//! Renders the core view models and turns what the user types into
//! `ChatIntent`s. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod notifier;
pub mod renderer;
