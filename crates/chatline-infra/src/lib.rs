//! Infrastructure layer for Chatline.
//!
//! Contains implementations of the port traits defined in `chatline-core`:
//! the reqwest-backed chat API transport, JSON-file device storage and
//! session history, and configuration loading.

pub mod config;
pub mod filesystem;
pub mod http;
