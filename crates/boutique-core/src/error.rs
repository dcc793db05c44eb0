use thiserror::Error;

pub type Result<T> = std::result::Result<T, ControllerError>;

/// Failure reported by the host while executing a fetch.
///
/// Only the message survives the trip across the host boundary; the browser
/// gives no stable structure for network failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request rejected by server{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Rejected { message: Option<String> },

    #[error("{capability} is not implemented")]
    NotImplemented { capability: &'static str },
}

impl ControllerError {
    #[must_use]
    pub fn rejected(message: Option<String>) -> Self {
        Self::Rejected { message }
    }

    /// Message supplied by the server, when the failure carries one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message } => message.as_deref(),
            _ => None,
        }
    }
}
