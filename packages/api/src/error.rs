//! Error types for the wire layer.

use thiserror::Error;

/// Failure of a single call to an external service.
///
/// Controllers never propagate these; they turn them into a user-visible error
/// state at the handler boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The service answered and said no (non-2xx, or an identity-provider error body).
    #[error("request rejected: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: Option<u16>,
        code: Option<String>,
        message: Option<String>,
    },

    /// The request never got an answer.
    #[error("transport error: {0}")]
    Transport(String),

    /// The answer could not be understood.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The selected backend has no such operation.
    #[error("{0} is not supported by this backend")]
    Unsupported(&'static str),
}

impl ServiceError {
    /// A bare rejection carrying only the HTTP status.
    pub fn status(status: u16) -> Self {
        Self::Rejected {
            status: Some(status),
            code: None,
            message: None,
        }
    }

    /// A rejection with a provider error code and a human-readable message.
    pub fn rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            status: Some(400),
            code: Some(code.into()),
            message: Some(message.into()),
        }
    }

    /// The human-readable message supplied by the service, if any.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    /// True when the service was never reached or its answer was unreadable.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Decode(_))
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::status(status.as_u16())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Problems with `receipts.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing required setting `{0}`")]
    Missing(&'static str),
}
