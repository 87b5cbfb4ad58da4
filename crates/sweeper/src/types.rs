//! Core data types for the deletion scheduler.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-channel tracking state: the TTL applied to new messages plus the
/// pending map of message id -> deletion deadline (epoch seconds).
///
/// A TTL of 0 means tracking is disabled for the channel. Changing the TTL
/// never rewrites deadlines already in `pending`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChannelConfig {
    #[serde(default)]
    pub ttl_seconds: u64,
    #[serde(default)]
    pub pending: HashMap<String, u64>,
}

impl ChannelConfig {
    /// Whether new messages in this channel get a deletion deadline.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.ttl_seconds != 0
    }
}

/// Listing row for channels with a non-zero TTL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrackedChannel {
    pub channel_id: String,
    pub ttl_seconds: u64,
}

/// Outcome of a manual un-tracking request: which of the requested ids were
/// actually pending, and which were unknown (not an error).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RemoveReport {
    pub removed: Vec<String>,
    pub not_found: Vec<String>,
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_disabled() {
        let config = ChannelConfig::default();
        assert!(!config.is_tracking());
        assert!(config.pending.is_empty());
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut config = ChannelConfig {
            ttl_seconds: 300,
            pending: HashMap::new(),
        };
        config.pending.insert("123".into(), 1_700_000_000);

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("ttlSeconds"));
        let back: ChannelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let config: ChannelConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ChannelConfig::default());
    }
}
