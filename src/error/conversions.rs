//! Type Conversions for NetworkError
//!
//! From trait implementations for converting common error types into
//! NetworkError.

use super::types::NetworkError;

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return NetworkError::transport_status(status.as_u16(), None);
        }
        let code = if err.is_timeout() {
            "timeout"
        } else if err.is_connect() {
            "connect"
        } else if err.is_body() || err.is_decode() {
            "body"
        } else {
            "request"
        };
        NetworkError::transport_failure(code, err.to_string())
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}
