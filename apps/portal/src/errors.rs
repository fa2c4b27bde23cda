#![allow(dead_code)]

use thiserror::Error;

/// Portal-level error type.
///
/// The only failure surfaced to users is a toast; `toast_message` is the
/// single place that decides its wording.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl PortalError {
    /// User-facing text for the error toast.
    pub fn toast_message(&self) -> String {
        match self {
            PortalError::Api { status, message } => {
                if message.trim().is_empty() {
                    reqwest::StatusCode::from_u16(*status)
                        .ok()
                        .and_then(|s| s.canonical_reason())
                        .unwrap_or("Request failed")
                        .to_string()
                } else {
                    message.clone()
                }
            }
            PortalError::Http(e) if e.is_timeout() => "The server took too long to respond".to_string(),
            PortalError::Http(_) => "Could not reach the server".to_string(),
            PortalError::Parse(_) => "The server sent an unexpected response".to_string(),
            PortalError::Url(_) => "The server address is invalid".to_string(),
            PortalError::Validation(msg) => msg.clone(),
            PortalError::NotFound(what) => format!("{what} was not found"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Transient notification produced at the mutation boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ToastKind::Error
    }
}

impl From<&PortalError> for Toast {
    fn from(err: &PortalError) -> Self {
        Toast::error(err.toast_message())
    }
}
