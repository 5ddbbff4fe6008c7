//! API failure taxonomy and user-facing message extraction.
//!
//! ERROR HANDLING
//! ==============
//! Every HTTP call resolves to `Result<_, ApiError>`. Pages never inspect
//! payloads themselves; they hand the error to [`extract_error_message`]
//! with a fallback string and render whatever comes back.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde_json::Value;

/// Errors produced by API client operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// The backend rejected the session credential (HTTP 401).
    #[error("authentication required")]
    Unauthorized { body: Value },

    /// The backend returned any other non-success status.
    #[error("request failed with status {status}")]
    Status { status: u16, body: Value },

    /// The request never produced an HTTP response.
    #[error("transport failure: {0}")]
    Transport(String),

    /// A success response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    /// Server-provided error payload, if any.
    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Unauthorized { body } | Self::Status { body, .. } => Some(body),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Map a failed call to a human-readable message.
///
/// A string `detail` is returned verbatim. A list `detail` (validation
/// issues) becomes each item's `msg`, or the item's compact JSON when it has
/// none, joined with `"; "`. Anything else yields `fallback`.
#[must_use]
pub fn extract_error_message(err: &ApiError, fallback: &str) -> String {
    detail_message(err.payload()).unwrap_or_else(|| fallback.to_owned())
}

/// Payload-level half of [`extract_error_message`]; `None` means "no usable
/// detail".
#[must_use]
pub fn detail_message(payload: Option<&Value>) -> Option<String> {
    match payload?.get("detail")? {
        Value::String(detail) if !detail.is_empty() => Some(detail.clone()),
        Value::Array(issues) if !issues.is_empty() => {
            Some(issues.iter().map(issue_message).collect::<Vec<_>>().join("; "))
        }
        _ => None,
    }
}

fn issue_message(issue: &Value) -> String {
    match issue.get("msg") {
        Some(Value::String(msg)) if !msg.is_empty() => msg.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_owned(),
        _ => serde_json::to_string(issue).unwrap_or_default(),
    }
}
