use std::path::PathBuf;

use reqwest::StatusCode;
use shared::error::DocumentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("orders API returned {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("request to orders API failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response body from orders API: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid API base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("unsupported upload: {0}")]
    UnsupportedFile(String),
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("no invoice is loaded")]
    NoDocument,
    #[error("the loaded invoice is not an existing order")]
    NotEditing,
    #[error("no order is awaiting delete confirmation")]
    NoPendingDelete,
    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl ClientError {
    /// Text shown to the user for a failed operation: the server's own
    /// message when it sent one, the operation's fallback for other remote
    /// failures, and the error itself for problems caught locally.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Api { message: None, .. }
            | Self::Transport(_)
            | Self::Decode(_)
            | Self::InvalidBaseUrl(_) => fallback.to_string(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }
}
