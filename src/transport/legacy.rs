//! Legacy HTTP/1.1 transport.

use async_trait::async_trait;

use super::client::{build_legacy_client, execute_json_post};
use super::{RawResponse, TransportKind, TransportStrategy, is_http_url};
use crate::config::HttpConfig;
use crate::error::NetworkError;

/// Legacy-request-style transport: a bare HTTP/1.1 client that ignores
/// proxy and default-header settings.
#[derive(Debug, Clone)]
pub struct LegacyTransport {
    client: Option<reqwest::Client>,
}

impl LegacyTransport {
    pub fn new(config: &HttpConfig) -> Self {
        match build_legacy_client(config) {
            Ok(client) => Self {
                client: Some(client),
            },
            Err(e) => {
                tracing::warn!(target: "edge_collect::transport", error = %e, "legacy transport unavailable");
                Self { client: None }
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }
}

#[async_trait]
impl TransportStrategy for LegacyTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Legacy
    }

    fn can_handle(&self, url: &str, _body: &str, _response_required: bool) -> bool {
        self.client.is_some() && is_http_url(url)
    }

    async fn call(&self, url: &str, body: String) -> Result<RawResponse, NetworkError> {
        let client = self.client.as_ref().ok_or_else(|| {
            NetworkError::transport_failure("unsupported", "Legacy transport is not available.")
        })?;
        tracing::debug!(target: "edge_collect::transport", transport = "legacy", url = %url, "sending request");
        execute_json_post(client, url, body).await
    }
}
