//! Failure channel for the API client.
//!
//! Every way a request can go wrong ends up here with a human-readable
//! message, so callers can hand it straight to the toast queue.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// No response was obtained (connect, DNS, timeout, broken body stream).
    #[error("{message}")]
    Transport { message: String },

    /// The request body could not be serialized to JSON.
    #[error("Failed to encode request body: {message}")]
    Encode { message: String },

    /// A successful body did not match the expected shape.
    #[error("Failed to decode response: {message}")]
    Decode { message: String },
}

impl ApiError {
    /// Generic message used when the error body carries no usable `message`.
    pub fn status_fallback(status: u16) -> Self {
        ApiError::Status {
            status,
            message: format!("HTTP {}", status),
        }
    }

    /// Message suitable for showing to the user.
    pub fn message(&self) -> String {
        match self {
            ApiError::Status { message, .. } | ApiError::Transport { message } => message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status code, only present when the backend actually responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("Request timed out: {}", err)
        } else if err.is_connect() {
            format!("Connection failed: {}", err)
        } else if err.is_body() || err.is_decode() {
            format!("Failed to read response body: {}", err)
        } else {
            format!("Request failed: {}", err)
        };
        ApiError::Transport { message }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Encode {
            message: err.to_string(),
        }
    }
}
