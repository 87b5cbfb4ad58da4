//! Trait seams for the chat platform: message fetch/delete and channel
//! resolution. The gateway provides the concrete implementations.

use {async_trait::async_trait, thiserror::Error};

/// Failure modes of the message backend.
///
/// `NotFound` and `Forbidden` are terminal: retrying will never change the
/// outcome without outside intervention. Everything else (rate limits, server
/// errors, connection drops) is transient and worth retrying next cycle.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("message not found")]
    NotFound,

    #[error("forbidden")]
    Forbidden,

    #[error("transient backend failure: {0}")]
    Transient(String),
}

impl BackendError {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::NotFound | Self::Forbidden)
    }
}

/// A fetched message, reduced to what the sweeper needs.
#[derive(Debug, Clone)]
pub struct FetchedMessage {
    pub id: String,
    pub pinned: bool,
}

/// Message fetch/delete operations against the hosting platform.
#[async_trait]
pub trait MessageBackend: Send + Sync {
    async fn fetch_message(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> Result<FetchedMessage, BackendError>;

    async fn delete_message(&self, channel_id: &str, message_id: &str)
    -> Result<(), BackendError>;
}

/// What a channel id currently resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Text,
    Thread,
    /// Voice, category, forum shell, DM — anything the sweeper must not touch.
    Other,
}

/// Snapshot of a resolved channel.
#[derive(Debug, Clone)]
pub struct ResolvedChannel {
    pub kind: ChannelKind,
    /// Whether the bot itself holds manage-messages here.
    pub bot_can_manage: bool,
}

impl ResolvedChannel {
    /// Only text channels and threads carry deletable message history.
    #[must_use]
    pub fn is_trackable(&self) -> bool {
        matches!(self.kind, ChannelKind::Text | ChannelKind::Thread)
    }
}

/// Channel lookup and permission checks.
#[async_trait]
pub trait ChannelDirectory: Send + Sync {
    /// Resolve a channel id, `None` when deleted or unknown.
    async fn resolve(&self, channel_id: &str) -> Option<ResolvedChannel>;

    /// Whether `user_id` may manage messages in the channel.
    async fn can_manage_messages(&self, channel_id: &str, user_id: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_classification() {
        assert!(BackendError::NotFound.is_terminal());
        assert!(BackendError::Forbidden.is_terminal());
        assert!(!BackendError::Transient("rate limited".into()).is_terminal());
    }

    #[test]
    fn test_trackable_kinds() {
        let text = ResolvedChannel {
            kind: ChannelKind::Text,
            bot_can_manage: true,
        };
        let thread = ResolvedChannel {
            kind: ChannelKind::Thread,
            bot_can_manage: true,
        };
        let other = ResolvedChannel {
            kind: ChannelKind::Other,
            bot_can_manage: true,
        };
        assert!(text.is_trackable());
        assert!(thread.is_trackable());
        assert!(!other.is_trackable());
    }
}
