use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body the orders API returns alongside a non-2xx status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, alias = "message", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
        }
    }

    /// The server message, if it carried a non-blank one.
    pub fn message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("unknown field path `{0}`")]
    UnknownField(String),
    #[error("unknown line item field `{0}`")]
    UnknownLineItemField(String),
    #[error("line totals are derived from quantity and unit price and cannot be edited")]
    DerivedLineTotal,
    #[error("line item {index} does not exist (document has {len} line items)")]
    LineItemOutOfRange { index: usize, len: usize },
}
