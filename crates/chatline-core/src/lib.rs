//! Conversation state management and port trait definitions for Chatline.
//!
//! This crate defines the "ports" (storage, transport, history, notifier
//! traits) that the infrastructure layer implements, plus the identity store,
//! the conversation state manager, and the view models the front end renders.
//! It depends only on `chatline-types` -- never on `chatline-infra` or any
//! network/filesystem crate.

pub mod chat;
pub mod identity;
pub mod storage;
pub mod transport;
pub mod view;
