//! Client configuration loader for Chatline.
//!
//! Reads `config.toml` from the data directory (`~/.chatline/` in production)
//! and deserializes it into [`ClientConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::Path;

use chatline_types::config::ClientConfig;

/// Load client configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ClientConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and returns the default.
/// - Otherwise returns the parsed config.
pub async fn load_client_config(data_dir: &Path) -> ClientConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ClientConfig::default()
        }
    }
}

/// Apply command-line overrides on top of the file configuration.
///
/// A blank override is ignored.
pub fn apply_api_url_override(mut config: ClientConfig, api_url: Option<&str>) -> ClientConfig {
    if let Some(url) = api_url.map(str::trim).filter(|u| !u.is_empty()) {
        config.api_base_url = url.to_string();
    }
    config
}
