//! Application state wiring the client together.
//!
//! `ChatStore` is generic over its transport, history, and notifier; AppState
//! pins it to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use chatline_core::chat::store::ChatStore;
use chatline_core::identity::IdentityStore;
use chatline_infra::config::{apply_api_url_override, load_client_config};
use chatline_infra::filesystem::history::FileSessionHistory;
use chatline_infra::filesystem::kv::JsonFileStorage;
use chatline_infra::filesystem::{resolve_data_dir, sessions_path, storage_path};
use chatline_infra::http::HttpChatTransport;
use chatline_types::chat::ClientIdentity;
use chatline_types::config::ClientConfig;

use crate::cli::chat::notifier::TerminalNotifier;

pub type ConcreteChatStore = ChatStore<HttpChatTransport, FileSessionHistory, Arc<TerminalNotifier>>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ConcreteChatStore>,
    pub identity: ClientIdentity,
    pub notifier: Arc<TerminalNotifier>,
    pub config: ClientConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Resolve config and identity, then build the chat store.
    pub async fn init(api_url: Option<&str>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = apply_api_url_override(load_client_config(&data_dir).await, api_url);

        let identity_store =
            IdentityStore::new(JsonFileStorage::new(storage_path(&data_dir)), config.identity.clone());
        let identity = identity_store.mount().await;

        let transport = HttpChatTransport::from_config(&config)?;
        let history = FileSessionHistory::new(sessions_path(&data_dir));
        let notifier = Arc::new(TerminalNotifier::new());

        let chat = ChatStore::new(identity.clone(), transport, history, notifier.clone());
        if let Err(e) = chat.mount().await {
            tracing::warn!(error = %e, "Failed to load session list");
        }

        tracing::debug!(
            data_dir = %data_dir.display(),
            endpoint = %config.chat_url(),
            "Application state initialized"
        );

        Ok(Self {
            chat: Arc::new(chat),
            identity,
            notifier,
            config,
            data_dir,
        })
    }
}
