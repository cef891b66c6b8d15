//! Transport strategies
//!
//! A closed set of delivery mechanisms behind one trait:
//! - [`FetchTransport`]: rich HTTP client built from `HttpConfig`
//! - [`LegacyTransport`]: minimal HTTP/1.1 client used when the rich one is unusable
//! - [`BeaconTransport`]: fire-and-forget delivery that never yields a body
//!
//! [`TransportSelector`] probes the candidates once and caches the choice.

pub mod beacon;
pub mod client;
pub mod fetch;
pub mod legacy;
pub mod selector;

pub use beacon::BeaconTransport;
pub use client::{build_http_client_from_config, build_legacy_client};
pub use fetch::FetchTransport;
pub use legacy::LegacyTransport;
pub use selector::TransportSelector;

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;

use crate::error::NetworkError;

/// Future resolving to the next link of a chained response.
pub type Continuation = BoxFuture<'static, Result<RawResponse, NetworkError>>;

/// One transport-level reply, optionally linked to the next one.
pub struct RawResponse {
    pub body: String,
    pub continuation: Option<Continuation>,
}

impl RawResponse {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            continuation: None,
        }
    }

    /// Empty body, no continuation (204 or beacon acknowledgement).
    pub fn empty() -> Self {
        Self::new(String::new())
    }

    /// Attach the future producing the next link.
    pub fn with_continuation<F>(mut self, next: F) -> Self
    where
        F: Future<Output = Result<RawResponse, NetworkError>> + Send + 'static,
    {
        self.continuation = Some(Box::pin(next));
        self
    }

    pub fn has_continuation(&self) -> bool {
        self.continuation.is_some()
    }
}

impl fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawResponse")
            .field("body", &self.body)
            .field("has_continuation", &self.has_continuation())
            .finish()
    }
}

/// The closed set of transport variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    Fetch,
    Legacy,
    Beacon,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportKind::Fetch => "fetch",
            TransportKind::Legacy => "legacy",
            TransportKind::Beacon => "beacon",
        };
        f.write_str(name)
    }
}

/// Delivery mechanism for one serialized payload.
///
/// `call` must only be invoked after `can_handle` returned `true` for
/// equivalent arguments.
#[async_trait]
pub trait TransportStrategy: Send + Sync {
    fn kind(&self) -> TransportKind;

    /// Synchronous feature detection; never touches the network.
    fn can_handle(&self, url: &str, body: &str, response_required: bool) -> bool;

    /// Deliver `body` to `url`.
    ///
    /// Resolves with the response body on any 2xx (empty on 204) and fails
    /// with `NetworkError::TransportError` otherwise.
    async fn call(&self, url: &str, body: String) -> Result<RawResponse, NetworkError>;
}

/// Whether `url` is an absolute `http`/`https` URL.
pub(crate) fn is_http_url(url: &str) -> bool {
    reqwest::Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}
