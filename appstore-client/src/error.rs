use serde_json::Value;
use thiserror::Error;

/// Failure of a single API call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced an HTTP response (connection refused, DNS,
    /// TLS, body read). Surfaced verbatim.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Normalized human-readable message.
        message: String,
        /// Parsed response body.
        payload: Value,
    },

    /// The backend answered successfully but not in the agreed shape.
    #[error("{0}")]
    Contract(String),

    /// The request body could not be encoded.
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status of a [`ClientError::Status`] failure.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// Whether the backend rejected the credential.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Failure of a session operation.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The backend call itself failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Another boot, login, register, or refresh is still running.
    #[error("another session operation is already in progress")]
    Busy,

    /// `boot` was called a second time.
    #[error("the session has already been restored")]
    AlreadyBooted,

    /// `logout` ran while the operation was outstanding; its result was dropped.
    #[error("signed out before the operation completed")]
    Cancelled,
}
