//! In-memory store for tests and embedders that handle persistence upstream.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;

use crate::{Result, store::ConfigStore, types::ChannelConfig};

/// In-memory store backed by `HashMap`. No persistence across restarts.
#[derive(Default)]
pub struct MemoryStore {
    channels: Mutex<HashMap<String, ChannelConfig>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn get_channel(&self, channel_id: &str) -> Result<ChannelConfig> {
        let channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        Ok(channels.get(channel_id).cloned().unwrap_or_default())
    }

    async fn set_ttl(&self, channel_id: &str, ttl_seconds: u64) -> Result<()> {
        let mut channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        channels.entry(channel_id.to_string()).or_default().ttl_seconds = ttl_seconds;
        Ok(())
    }

    async fn set_pending(&self, channel_id: &str, pending: HashMap<String, u64>) -> Result<()> {
        let mut channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        channels.entry(channel_id.to_string()).or_default().pending = pending;
        Ok(())
    }

    async fn all_channels(&self) -> Result<HashMap<String, ChannelConfig>> {
        let channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        Ok(channels.clone())
    }
}
