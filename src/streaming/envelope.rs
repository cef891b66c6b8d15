//! Response envelope wire format.

use serde::{Deserialize, Serialize};

use crate::error::NetworkError;

/// One server-pushed unit of data, tagged with a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFragment {
    #[serde(rename = "type")]
    pub fragment_type: String,
    pub payload: serde_json::Value,
}

/// Parsed body of one response link:
/// `{"requestId": "...", "handle": [{"type": "...", "payload": {...}}]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(rename = "requestId")]
    pub request_id: String,
    pub handle: Vec<ResponseFragment>,
}

impl ResponseEnvelope {
    /// Parse a raw body; invalid JSON or a missing field is a `ParseError`.
    pub fn parse(body: &str) -> Result<Self, NetworkError> {
        serde_json::from_str(body).map_err(|e| NetworkError::ParseError(e.to_string()))
    }
}
