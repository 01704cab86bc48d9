//! Filesystem adapters for Chatline.
//!
//! The data directory holds everything the client persists:
//!
//! ```text
//! {data_dir}/
//!   config.toml     client configuration (optional)
//!   storage.json    device key/value storage (the user id lives here)
//!   sessions.json   session history transcripts
//! ```

pub mod history;
pub mod kv;

use std::io::Write;
use std::path::{Path, PathBuf};

/// Path of the device key/value storage file.
pub fn storage_path(data_dir: &Path) -> PathBuf {
    data_dir.join("storage.json")
}

/// Path of the session history file.
pub fn sessions_path(data_dir: &Path) -> PathBuf {
    data_dir.join("sessions.json")
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `CHATLINE_DATA_DIR` environment variable
/// 2. `~/.chatline` under the home directory
/// 3. `.chatline` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHATLINE_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chatline");
    }

    PathBuf::from(".chatline")
}

/// Replace a file's content by writing a sibling temp file and renaming it.
///
/// Creates parent directories as needed. The temp file gets a unique name,
/// so concurrent writers never clobber each other's partial output, and a
/// crash mid-write leaves the old content in place.
pub(crate) async fn write_atomic(path: &Path, content: &str) -> Result<(), std::io::Error> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    tokio::fs::create_dir_all(&parent).await?;

    let path = path.to_path_buf();
    let content = content.to_owned();
    tokio::task::spawn_blocking(move || -> std::io::Result<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path)?;
        Ok(())
    })
    .await
    .map_err(std::io::Error::other)?
}

/// Read a file, mapping "not found" to `None`.
pub(crate) async fn read_optional(path: &Path) -> Result<Option<String>, std::io::Error> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_atomic_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("storage.json");

        write_atomic(&path, "{}").await.unwrap();
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_write_atomic_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sessions.json");

        let (a, b) = tokio::join!(write_atomic(&path, "[1]"), write_atomic(&path, "[2]"));
        a.unwrap();
        b.unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("sessions.json")]);

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(content == "[1]" || content == "[2]");
    }

    #[tokio::test]
    async fn test_write_atomic_replaces_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file.json");

        write_atomic(&path, "first").await.unwrap();
        write_atomic(&path, "second").await.unwrap();
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "second");
    }

    #[tokio::test]
    async fn test_read_optional_missing_file() {
        let dir = tempdir().unwrap();
        let missing = read_optional(&dir.path().join("nope.json")).await.unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_data_dir_paths() {
        let data_dir = PathBuf::from("/home/user/.chatline");
        assert_eq!(
            storage_path(&data_dir),
            PathBuf::from("/home/user/.chatline/storage.json")
        );
        assert_eq!(
            sessions_path(&data_dir),
            PathBuf::from("/home/user/.chatline/sessions.json")
        );
    }

    #[test]
    fn test_resolve_data_dir_from_env() {
        // SAFETY: This test is single-threaded and restores the env var immediately.
        unsafe {
            std::env::set_var("CHATLINE_DATA_DIR", "/tmp/test-chatline");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-chatline"));
        unsafe {
            std::env::remove_var("CHATLINE_DATA_DIR");
        }
    }
}
