//! Shared domain types for Chatline.
//!
//! Messages, conversation ids, session summaries, wire bodies for the chat
//! API, configuration, and the error enums used across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
