use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimErrorKind {
    /// No response received at all: DNS, connect, or timeout failure.
    Transport,
    /// The endpoint answered with an application-level error body.
    Api,
}

/// Per-attempt failure consumed by the classifier. Never escapes the
/// per-identity loop; it only shapes that identity's terminal outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimError {
    pub kind: ClaimErrorKind,
    pub message: String,
    pub http_status: Option<u16>,
}

impl ClaimError {
    pub fn new(kind: ClaimErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            http_status: None,
        }
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }
}

impl fmt::Display for ClaimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ClaimError {}

pub fn transport_error(message: impl Into<String>) -> ClaimError {
    ClaimError::new(ClaimErrorKind::Transport, message)
}

pub fn api_error(message: impl Into<String>) -> ClaimError {
    ClaimError::new(ClaimErrorKind::Api, message)
}
