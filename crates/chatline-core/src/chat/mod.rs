//! Conversation state for Chatline.
//!
//! `ChatStore` is the state manager; `SessionHistory` and `FailureNotifier`
//! are the ports it depends on besides the transport.

pub mod history;
pub mod notify;
pub mod state;
pub mod store;
