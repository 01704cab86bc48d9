//! HTTP adapters for the chat API.

pub mod client;

pub use client::HttpChatTransport;
