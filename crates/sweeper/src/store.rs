//! Persistence trait for per-channel tracking state.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::{Result, types::ChannelConfig};

/// Persistent per-channel key-value store. The store is the single source of
/// truth across restarts; the service only ever holds transient working
/// copies of what it returns.
///
/// Implementations must make each call atomic on its own; callers are
/// responsible for serializing read-decide-write sequences (the service holds
/// one lock around all of them).
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetch one channel's config, defaulting (TTL 0, empty pending) when the
    /// channel has never been touched. Never fails with "not found".
    async fn get_channel(&self, channel_id: &str) -> Result<ChannelConfig>;

    /// Set the TTL for a channel, leaving its pending map untouched.
    async fn set_ttl(&self, channel_id: &str, ttl_seconds: u64) -> Result<()>;

    /// Replace a channel's entire pending map.
    async fn set_pending(&self, channel_id: &str, pending: HashMap<String, u64>) -> Result<()>;

    /// Snapshot every stored channel config.
    async fn all_channels(&self) -> Result<HashMap<String, ChannelConfig>>;
}
