//! Error types for the backend client.

use thiserror::Error;

/// Errors raised while talking to the clinic backend.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection, TLS or body transfer failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    /// The body was not the JSON shape we expect.
    #[error("Failed to decode {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("Timeout: {endpoint}")]
    Timeout { endpoint: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    pub fn decode(endpoint: &str, message: impl Into<String>) -> Self {
        ClientError::Decode {
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }

    /// Whether the same request may succeed on the next poll.
    ///
    /// Used to pick the log level; the client itself never retries.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Network(_) | ClientError::Timeout { .. } => true,
            ClientError::Status { status, .. } => *status == 429 || *status >= 500,
            ClientError::Decode { .. } | ClientError::InvalidUrl(_) => false,
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<ClientError> for clinicdesk_core::Error {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Decode { endpoint, message } => {
                clinicdesk_core::Error::Payload { endpoint, message }
            }
            ClientError::InvalidUrl(message) => clinicdesk_core::Error::InvalidConfigValue(message),
            other => clinicdesk_core::Error::Backend(other.to_string()),
        }
    }
}
