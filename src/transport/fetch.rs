//! Rich HTTP transport.

use async_trait::async_trait;

use super::client::{build_http_client_from_config, execute_json_post};
use super::{RawResponse, TransportKind, TransportStrategy, is_http_url};
use crate::config::HttpConfig;
use crate::error::NetworkError;

/// Fetch-style transport backed by the fully configured `reqwest` client.
///
/// The client is built once; when the configuration cannot produce a client
/// (bad proxy, bad header) the adapter reports itself unavailable instead of
/// failing, so the selector can fall back.
#[derive(Debug, Clone)]
pub struct FetchTransport {
    client: Option<reqwest::Client>,
}

impl FetchTransport {
    pub fn new(config: &HttpConfig) -> Self {
        match build_http_client_from_config(config) {
            Ok(client) => Self {
                client: Some(client),
            },
            Err(e) => {
                tracing::warn!(target: "edge_collect::transport", error = %e, "fetch transport unavailable");
                Self { client: None }
            }
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client: Some(client),
        }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }
}

#[async_trait]
impl TransportStrategy for FetchTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Fetch
    }

    fn can_handle(&self, url: &str, _body: &str, _response_required: bool) -> bool {
        self.client.is_some() && is_http_url(url)
    }

    async fn call(&self, url: &str, body: String) -> Result<RawResponse, NetworkError> {
        let client = self.client.as_ref().ok_or_else(|| {
            NetworkError::transport_failure("unsupported", "Fetch transport is not available.")
        })?;
        tracing::debug!(target: "edge_collect::transport", transport = "fetch", url = %url, "sending request");
        execute_json_post(client, url, body).await
    }
}
