//! Fire-and-forget beacon transport.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use super::client::{BEACON_CONTENT_TYPE, build_http_client_from_config};
use super::{RawResponse, TransportKind, TransportStrategy, is_http_url};
use crate::config::{BeaconConfig, HttpConfig};
use crate::error::NetworkError;

/// Beacon-style transport.
///
/// `call` queues the POST on the ambient Tokio runtime and resolves as soon
/// as the delivery is queued; the response is never read back. Delivery
/// failures after queueing are logged only.
#[derive(Debug, Clone)]
pub struct BeaconTransport {
    client: Option<reqwest::Client>,
    config: BeaconConfig,
}

impl BeaconTransport {
    pub fn new(http: &HttpConfig, config: BeaconConfig) -> Self {
        let client = match build_http_client_from_config(http) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(target: "edge_collect::transport", error = %e, "beacon transport unavailable");
                None
            }
        };
        Self { client, config }
    }

    pub fn with_client(client: reqwest::Client, config: BeaconConfig) -> Self {
        Self {
            client: Some(client),
            config,
        }
    }

    pub fn max_payload_bytes(&self) -> usize {
        self.config.max_payload_bytes
    }
}

#[async_trait]
impl TransportStrategy for BeaconTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Beacon
    }

    /// Selection probes with an empty body, so the size quota only rules
    /// out a concrete oversized body. No runtime is needed to probe; `call`
    /// queues onto the runtime it is awaited on.
    fn can_handle(&self, url: &str, body: &str, response_required: bool) -> bool {
        !response_required
            && self.config.enabled
            && self.client.is_some()
            && body.len() <= self.config.max_payload_bytes
            && is_http_url(url)
    }

    async fn call(&self, url: &str, body: String) -> Result<RawResponse, NetworkError> {
        if body.len() > self.config.max_payload_bytes {
            return Err(NetworkError::transport_failure(
                "payload_too_large",
                format!(
                    "Beacon payload of {} bytes exceeds the {} byte limit.",
                    body.len(),
                    self.config.max_payload_bytes
                ),
            ));
        }
        let (Some(client), Ok(runtime)) =
            (self.client.clone(), tokio::runtime::Handle::try_current())
        else {
            return Err(NetworkError::transport_failure(
                "beacon",
                "Unable to send beacon.",
            ));
        };

        let url = url.to_string();
        runtime.spawn(async move {
            let result = client
                .post(&url)
                .header(CONTENT_TYPE, BEACON_CONTENT_TYPE)
                .body(body)
                .send()
                .await;
            match result {
                Ok(resp) if resp.status().is_success() => {
                    tracing::debug!(target: "edge_collect::transport", url = %url, status = resp.status().as_u16(), "beacon delivered");
                }
                Ok(resp) => {
                    tracing::warn!(target: "edge_collect::transport", url = %url, status = resp.status().as_u16(), "beacon rejected");
                }
                Err(e) => {
                    tracing::warn!(target: "edge_collect::transport", url = %url, error = %e, "beacon delivery failed");
                }
            }
        });

        Ok(RawResponse::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn transport(config: BeaconConfig) -> BeaconTransport {
        BeaconTransport::new(&HttpConfig::default(), config)
    }

    #[tokio::test]
    async fn sends_a_beacon() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/myapi")
            .match_header("content-type", "text/plain; charset=UTF-8")
            .match_body(r#"{"id":"myrequest"}"#)
            .with_status(204)
            .expect(1)
            .create_async()
            .await;

        let url = format!("{}/myapi", server.url());
        let raw = transport(BeaconConfig::default())
            .call(&url, r#"{"id":"myrequest"}"#.to_string())
            .await
            .unwrap();
        assert_eq!(raw.body, "");
        assert!(!raw.has_continuation());

        for _ in 0..100 {
            if mock.matched_async().await {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejects_oversized_payloads() {
        let transport = transport(BeaconConfig {
            enabled: true,
            max_payload_bytes: 4,
        });
        let err = transport
            .call("http://localhost/x", "too long".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some("payload_too_large"));
    }

    #[tokio::test]
    async fn never_handles_requests_needing_a_response() {
        let transport = transport(BeaconConfig::default());
        assert!(transport.can_handle("https://example.com/v1/p1/collect", "", false));
        assert!(!transport.can_handle("https://example.com/v1/p1/collect", "", true));
    }

    #[tokio::test]
    async fn disabled_beacons_are_not_handled() {
        let transport = transport(BeaconConfig {
            enabled: false,
            ..Default::default()
        });
        assert!(!transport.can_handle("https://example.com/v1/p1/collect", "", false));
    }

    #[test]
    fn probing_needs_no_runtime() {
        let transport = transport(BeaconConfig::default());
        assert!(transport.can_handle("https://example.com/v1/p1/collect", "", false));
    }

    #[tokio::test]
    async fn oversized_bodies_are_not_handled() {
        let transport = transport(BeaconConfig {
            enabled: true,
            max_payload_bytes: 4,
        });
        assert!(transport.can_handle("http://localhost/x", "tiny", false));
        assert!(!transport.can_handle("http://localhost/x", "too long", false));
    }
}
