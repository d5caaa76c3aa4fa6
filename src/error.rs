//! Unified error handling for straybot.

use thiserror::Error;

/// Errors that can occur while running the bot.
///
/// Propagation policy: connect failures are swallowed and retried inside
/// [`crate::session::Session::connect`] and never appear here; credential
/// failures abort the controller before any network activity; read failures
/// terminate the chat loop and the controller reconnects.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("failed to read credentials from {path}: {source}")]
    CredentialLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse credentials: {0}")]
    CredentialParse(#[from] serde_json::Error),

    #[error("transport write failed: {0}")]
    Transport(#[source] std::io::Error),

    #[error("failed to read line from channel, disconnected")]
    ChannelRead,

    #[error("refusing to send an empty message")]
    EmptyMessage,

    #[error("not connected")]
    NotConnected,

    #[error(transparent)]
    Db(#[from] crate::db::DbError),
}

impl BotError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CredentialLoad { .. } => "credential_load",
            Self::CredentialParse(_) => "credential_parse",
            Self::Transport(_) => "transport",
            Self::ChannelRead => "channel_read",
            Self::EmptyMessage => "empty_message",
            Self::NotConnected => "not_connected",
            Self::Db(_) => "db",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(BotError::ChannelRead.error_code(), "channel_read");
        assert_eq!(BotError::EmptyMessage.error_code(), "empty_message");
        assert_eq!(BotError::NotConnected.error_code(), "not_connected");
    }

    #[test]
    fn test_credential_load_display_names_path() {
        let err = BotError::CredentialLoad {
            path: "private/oauth.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("private/oauth.json"));
    }
}
