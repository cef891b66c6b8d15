//! Constructors and accessors for `NetworkError`.

use super::types::NetworkError;

impl NetworkError {
    /// Non-success HTTP status, optionally with the raw body the server sent.
    pub fn transport_status(status: u16, body: Option<String>) -> Self {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("unexpected status");
        Self::TransportError {
            status: Some(status),
            code: None,
            body: body.filter(|b| !b.is_empty()),
            message: format!("Bad response code: {status} {reason}"),
        }
    }

    /// Client-side delivery failure without an HTTP status.
    pub fn transport_failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TransportError {
            status: None,
            code: Some(code.into()),
            body: None,
            message: message.into(),
        }
    }

    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::TransportError { .. })
    }

    /// HTTP status carried by a transport error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::TransportError { status, .. } => *status,
            _ => None,
        }
    }

    /// Client-side failure code carried by a transport error.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::TransportError { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Raw response body carried by a transport error.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::TransportError { body, .. } => body.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    #[test]
    fn status_error_keeps_status_and_body() {
        let err = NetworkError::transport_status(500, Some("err".into()));
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.body(), Some("err"));
        assert_eq!(err.category(), ErrorCategory::Transport);
        assert!(err.to_string().contains("status 500"));
    }

    #[test]
    fn empty_body_is_dropped() {
        let err = NetworkError::transport_status(403, Some(String::new()));
        assert_eq!(err.body(), None);
    }

    #[test]
    fn failure_carries_code_only() {
        let err = NetworkError::transport_failure("connect", "connection refused");
        assert_eq!(err.status(), None);
        assert_eq!(err.code(), Some("connect"));
        assert!(err.to_string().contains("(connect)"));
    }

    #[test]
    fn precondition_errors_are_classified() {
        assert_eq!(
            NetworkError::LifecycleNotRegistered.category(),
            ErrorCategory::Precondition
        );
        assert_eq!(NetworkError::PayloadFrozen.category(), ErrorCategory::Precondition);
        assert_eq!(
            NetworkError::ParseError("bad".into()).category(),
            ErrorCategory::Parse
        );
    }
}
