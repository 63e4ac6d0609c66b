//! Transport failures and their conversion into user-facing messages.
//!
//! Every network failure surfaces as a single [`TransportError`] kind; the
//! variants only carry detail for logging. Display strings never embed the
//! source error so that [`error_messages`] yields one message per cause level.
use reqwest::StatusCode;
use std::error::Error as StdError;
use thiserror::Error;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
    #[error("failed to reach {url}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected status {status} from {url}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("invalid response body from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
    #[error("invalid request URL")]
    Url(#[source] url::ParseError),
    #[error("background request was interrupted")]
    Interrupted(#[source] tokio::task::JoinError),
}

impl TransportError {
    /// Plain I/O-style failure with no underlying cause.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// I/O-style failure wrapping the error that triggered it.
    pub fn io_caused_by(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(cause.into()),
        }
    }
}

/// Walk the cause chain starting at `err`, collecting one message per level.
///
/// Errors whose `Display` output is empty fall back to their `Debug` form.
pub fn error_messages(err: &(dyn StdError + 'static)) -> Vec<String> {
    let mut messages = Vec::new();
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = current {
        let message = e.to_string();
        if message.is_empty() {
            messages.push(format!("{:?}", e));
        } else {
            messages.push(message);
        }
        current = e.source();
    }
    messages
}
