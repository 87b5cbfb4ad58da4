//! JSON file-backed config store with atomic writes.

use std::{collections::HashMap, path::PathBuf};

use {async_trait::async_trait, tokio::fs};

use crate::{Error, Result, store::ConfigStore, types::ChannelConfig};

/// File-backed store. All channel configs live in a single JSON document.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Create a store using the default `~/.janitor/channels.json` location.
    pub fn default_path() -> Result<Self> {
        let home = dirs_next::home_dir()
            .ok_or_else(|| Error::message("cannot determine home directory"))?;
        Ok(Self::new(home.join(".janitor").join("channels.json")))
    }

    async fn load_map(&self) -> Result<HashMap<String, ChannelConfig>> {
        if !fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(HashMap::new());
        }
        let data = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Atomic write: write to temp, rename over target, keep `.bak`.
    async fn atomic_write(&self, channels: &HashMap<String, ChannelConfig>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(channels)?;
        let tmp = self.path.with_extension("json.tmp");

        fs::write(&tmp, json.as_bytes()).await?;

        // Backup existing file.
        if fs::try_exists(&self.path).await.unwrap_or(false) {
            let bak = self.path.with_extension("json.bak");
            let _ = fs::rename(&self.path, &bak).await;
        }

        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for FileStore {
    async fn get_channel(&self, channel_id: &str) -> Result<ChannelConfig> {
        let channels = self.load_map().await?;
        Ok(channels.get(channel_id).cloned().unwrap_or_default())
    }

    async fn set_ttl(&self, channel_id: &str, ttl_seconds: u64) -> Result<()> {
        let mut channels = self.load_map().await?;
        channels.entry(channel_id.to_string()).or_default().ttl_seconds = ttl_seconds;
        self.atomic_write(&channels).await
    }

    async fn set_pending(&self, channel_id: &str, pending: HashMap<String, u64>) -> Result<()> {
        let mut channels = self.load_map().await?;
        channels.entry(channel_id.to_string()).or_default().pending = pending;
        self.atomic_write(&channels).await
    }

    async fn all_channels(&self) -> Result<HashMap<String, ChannelConfig>> {
        self.load_map().await
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileStore {
        FileStore::new(dir.path().join("channels.json"))
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.all_channels().await.unwrap().is_empty());
        assert_eq!(
            store.get_channel("c1").await.unwrap(),
            ChannelConfig::default()
        );
    }

    #[tokio::test]
    async fn test_roundtrip_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = store_in(&dir);
            store.set_ttl("c1", 300).await.unwrap();
            let mut pending = HashMap::new();
            pending.insert("m1".to_string(), 1_234);
            store.set_pending("c1", pending).await.unwrap();
        }

        let store = store_in(&dir);
        let config = store.get_channel("c1").await.unwrap();
        assert_eq!(config.ttl_seconds, 300);
        assert_eq!(config.pending.get("m1"), Some(&1_234));
    }

    #[tokio::test]
    async fn test_backup_kept_after_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set_ttl("c1", 60).await.unwrap();
        store.set_ttl("c1", 120).await.unwrap();

        assert!(dir.path().join("channels.json.bak").exists());
        let config = store.get_channel("c1").await.unwrap();
        assert_eq!(config.ttl_seconds, 120);
    }

    #[tokio::test]
    async fn test_set_pending_creates_channel() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let mut pending = HashMap::new();
        pending.insert("m1".to_string(), 99);
        store.set_pending("c9", pending).await.unwrap();

        let config = store.get_channel("c9").await.unwrap();
        assert_eq!(config.ttl_seconds, 0);
        assert_eq!(config.pending.len(), 1);
    }
}
