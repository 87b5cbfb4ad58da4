use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("invalid duration {input:?}: {reason}")]
    InvalidDuration { input: String, reason: String },

    #[error("wait times must be at least 5 seconds (got {seconds}s), or 0 to disable")]
    BelowMinimum { seconds: u64 },

    #[error("channel not available: {channel_id}")]
    ChannelUnavailable { channel_id: String },

    #[error("only text channels and threads can be tracked: {channel_id}")]
    UntrackableChannel { channel_id: String },

    #[error("missing manage-messages permission in {channel_id}: {who}")]
    PermissionDenied { channel_id: String, who: String },

    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn invalid_duration(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDuration {
            input: input.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn channel_unavailable(channel_id: impl Into<String>) -> Self {
        Self::ChannelUnavailable {
            channel_id: channel_id.into(),
        }
    }

    #[must_use]
    pub fn untrackable(channel_id: impl Into<String>) -> Self {
        Self::UntrackableChannel {
            channel_id: channel_id.into(),
        }
    }

    #[must_use]
    pub fn permission_denied(channel_id: impl Into<String>, who: impl Into<String>) -> Self {
        Self::PermissionDenied {
            channel_id: channel_id.into(),
            who: who.into(),
        }
    }

    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    /// True for errors caused by caller input rather than infrastructure —
    /// the front end renders these as replies instead of failing the command.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDuration { .. }
                | Self::BelowMinimum { .. }
                | Self::ChannelUnavailable { .. }
                | Self::UntrackableChannel { .. }
                | Self::PermissionDenied { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
