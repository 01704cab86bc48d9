//! Client configuration types for Chatline.
//!
//! `ClientConfig` represents `config.toml` in the data directory. Every field
//! has a default, so an empty or missing file is valid.

use serde::{Deserialize, Serialize};

/// Top-level client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the chat API, without a trailing path.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Path of the chat endpoint, appended to `api_base_url`.
    #[serde(default = "default_chat_path")]
    pub chat_path: String,

    /// Optional client-side timeout for a single turn. Unset means no timeout.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default)]
    pub identity: IdentityConfig,
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_chat_path() -> String {
    "/api/chat".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            chat_path: default_chat_path(),
            request_timeout_secs: None,
            identity: IdentityConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Full URL of the chat endpoint.
    pub fn chat_url(&self) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        if self.chat_path.starts_with('/') {
            format!("{base}{}", self.chat_path)
        } else {
            format!("{base}/{}", self.chat_path)
        }
    }
}

/// How the per-device user id is stored and generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Storage key holding the persisted id.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Literal prefix of generated ids.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Number of random lowercase alphanumeric characters after the prefix.
    #[serde(default = "default_suffix_len")]
    pub suffix_len: usize,
}

fn default_storage_key() -> String {
    "user_id".to_string()
}

fn default_prefix() -> String {
    "user-".to_string()
}

fn default_suffix_len() -> usize {
    8
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            prefix: default_prefix(),
            suffix_len: default_suffix_len(),
        }
    }
}
