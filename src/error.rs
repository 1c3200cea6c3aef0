//! Error taxonomy for gateway calls and session operations.
//!
//! ERROR HANDLING
//! ==============
//! `ApiError` classifies every failed call by the gateway's inbound stage.
//! `SessionError` is what login/change-password hand back to forms: its
//! `Display` is the message to show inline.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde_json::Value;

use crate::transport::TransportError;

pub const LOGIN_FALLBACK_MESSAGE: &str = "Could not connect to the server.";
pub const CHANGE_PASSWORD_FALLBACK_MESSAGE: &str = "Could not change the password.";

// =============================================================================
// API ERROR
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Local input rejected before any network call.
    #[error("{0}")]
    Validation(String),

    /// Remote 401. The session has already been invalidated when this is seen.
    #[error("authentication required")]
    Authentication { detail: Option<String> },

    /// Remote 403.
    #[error("forbidden")]
    Authorization { detail: Option<String> },

    /// Remote 404.
    #[error("not found")]
    NotFound { detail: Option<String> },

    /// Remote 5xx.
    #[error("server error: HTTP {status}")]
    Server { status: u16, detail: Option<String> },

    /// Any other non-success status (400, 409, 422, ...).
    #[error("request rejected: HTTP {status}")]
    Rejected { status: u16, detail: Option<String> },

    /// No response received.
    #[error(transparent)]
    Network(#[from] TransportError),

    /// Success status but the body did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-success response.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = extract_detail(body);
        match status {
            401 => Self::Authentication { detail },
            403 => Self::Authorization { detail },
            404 => Self::NotFound { detail },
            s if s >= 500 => Self::Server { status, detail },
            _ => Self::Rejected { status, detail },
        }
    }

    /// Human-readable message supplied by the remote service, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Authentication { detail }
            | Self::Authorization { detail }
            | Self::NotFound { detail }
            | Self::Server { detail, .. }
            | Self::Rejected { detail, .. } => detail.as_deref(),
            Self::Validation(message) => Some(message),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    /// Server error, timeout, or offline: the caller may retry by hand.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Server { .. } | Self::Network(_))
    }

    /// Remote 401.
    #[must_use]
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Notice text for a failed background call.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Authentication { .. } => "Your session has expired. Please sign in again.".to_owned(),
            Self::Authorization { .. } => "You do not have permission to perform this action.".to_owned(),
            Self::NotFound { .. } => "Resource not found.".to_owned(),
            Self::Server { .. } => "Server error. Please try again later.".to_owned(),
            Self::Network(TransportError::Timeout) => "The request timed out. Check your connection.".to_owned(),
            Self::Network(TransportError::Offline) => "No internet connection.".to_owned(),
            Self::Network(_) => "Could not reach the server.".to_owned(),
            Self::Validation(message) => message.clone(),
            Self::Rejected { detail, .. } => detail.clone().unwrap_or_else(|| "The request was rejected.".to_owned()),
            Self::Decode(_) => "Unexpected response from the server.".to_owned(),
        }
    }
}

/// Pull a message out of an error body.
///
/// Understands `{"detail": "..."}`, validation lists
/// (`{"detail": [{"msg": "..."}]}`) and `{"message": "..."}`.
#[must_use]
pub fn extract_detail(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return None;
    };
    match value.get("detail") {
        Some(Value::String(detail)) if !detail.trim().is_empty() => return Some(detail.clone()),
        Some(Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }
        _ => {}
    }
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.trim().is_empty())
        .map(ToOwned::to_owned)
}

// =============================================================================
// SESSION ERROR
// =============================================================================

/// Failure result of a session operation, ready for inline display.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Missing or malformed input; no request was sent.
    #[error("{0}")]
    Validation(String),

    /// `login` called while another login is pending.
    #[error("A sign-in is already in progress.")]
    LoginInProgress,

    /// The service refused the operation or could not be reached.
    #[error("{0}")]
    Rejected(String),

    /// A logout or forced invalidation happened while the call was in flight.
    #[error("The session changed while the request was in progress.")]
    Superseded,

    /// Credentials were accepted but could not be persisted.
    #[error("Could not save the session: {0}")]
    Storage(String),
}

impl SessionError {
    /// Turn a gateway failure into a displayable rejection.
    #[must_use]
    pub fn from_api(error: &ApiError, fallback: &str) -> Self {
        Self::Rejected(error.detail().unwrap_or(fallback).to_owned())
    }
}
