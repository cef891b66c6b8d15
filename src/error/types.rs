//! Core error types.

use thiserror::Error;

/// Error type shared by every component of the network layer.
///
/// The type is `Clone` because the response and completion futures of a
/// request are shared and may be awaited by several holders at once.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NetworkError {
    /// Delivery failed or the server answered with a non-success status.
    #[error("Transport error{}: {message}", display_status(.status, .code))]
    TransportError {
        /// HTTP status, when the server answered.
        status: Option<u16>,
        /// Client-side failure class (`connect`, `timeout`, `body`, ...).
        code: Option<String>,
        /// Raw response body, when one was read.
        body: Option<String>,
        message: String,
    },

    /// A response body was not a valid envelope.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A host fragment handler failed.
    #[error("Fragment hook error for '{fragment_type}' (request {request_id}): {message}")]
    FragmentHookError {
        request_id: String,
        fragment_type: String,
        message: String,
    },

    /// The host pre-send hook refused the request.
    #[error("Before-send hook error: {0}")]
    BeforeSendHookError(String),

    /// A request operation was attempted before a lifecycle was registered.
    #[error("Lifecycle not registered: register a lifecycle before creating requests")]
    LifecycleNotRegistered,

    #[error("Lifecycle already registered")]
    LifecycleAlreadyRegistered,

    /// The payload no longer accepts events.
    #[error("Payload is frozen: events cannot be added once the request was sent")]
    PayloadFrozen,

    /// No transport adapter can carry general sends in this environment.
    #[error("Unsupported transport: {0}")]
    UnsupportedTransport(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("JSON error: {0}")]
    JsonError(String),

    /// The request driver went away before publishing an outcome.
    #[error("Request abandoned: {0}")]
    RequestAbandoned(String),
}

fn display_status(status: &Option<u16>, code: &Option<String>) -> String {
    match (status, code) {
        (Some(status), _) => format!(" (status {status})"),
        (None, Some(code)) => format!(" ({code})"),
        (None, None) => String::new(),
    }
}

/// Coarse-grained error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Transport,
    Parse,
    Hook,
    /// Misuse of the API (two-phase init, frozen payload).
    Precondition,
    Configuration,
    Internal,
}

impl NetworkError {
    /// Classify this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TransportError { .. } => ErrorCategory::Transport,
            Self::ParseError(_) | Self::JsonError(_) => ErrorCategory::Parse,
            Self::FragmentHookError { .. } | Self::BeforeSendHookError(_) => ErrorCategory::Hook,
            Self::LifecycleNotRegistered
            | Self::LifecycleAlreadyRegistered
            | Self::PayloadFrozen => ErrorCategory::Precondition,
            Self::UnsupportedTransport(_) | Self::ConfigurationError(_) => {
                ErrorCategory::Configuration
            }
            Self::RequestAbandoned(_) => ErrorCategory::Internal,
        }
    }
}
