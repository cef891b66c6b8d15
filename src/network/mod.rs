//! Network component
//!
//! Two-phase setup: construct with a configuration and a transport
//! selector, register the host lifecycle once, then create requests.
//!
//! ```rust,ignore
//! let network = Network::from_config(config)?;
//! network.register(Arc::new(MyLifecycle))?;
//!
//! let request = network.new_request(false)?;
//! request.payload().add_event(&json!({"id": "myevent1"}))?;
//! request.send();
//! let summary = request.complete().await?;
//! ```

mod driver;
mod request;

pub use request::{CompletionFuture, CompletionSummary, Request, ResponseFuture, SharedOutcome};

use std::sync::{Arc, OnceLock};
use tokio::sync::oneshot;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::{COLLECT_ACTION, INTERACT_ACTION, NetworkConfig};
use crate::error::NetworkError;
use crate::lifecycle::Lifecycle;
use crate::payload::PayloadHandle;
use crate::transport::TransportSelector;
use driver::RequestJob;

/// Network component: builds and dispatches requests to the collection edge.
///
/// Cloning is cheap; clones share configuration, transports and the
/// registered lifecycle.
#[derive(Clone)]
pub struct Network {
    inner: Arc<NetworkInner>,
}

struct NetworkInner {
    config: NetworkConfig,
    selector: Arc<TransportSelector>,
    lifecycle: OnceLock<Arc<dyn Lifecycle>>,
}

impl Network {
    /// Namespace other components use to look this one up.
    pub const NAMESPACE: &'static str = "Network";

    pub fn new(config: NetworkConfig, selector: TransportSelector) -> Result<Self, NetworkError> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(NetworkInner {
                config,
                selector: Arc::new(selector),
                lifecycle: OnceLock::new(),
            }),
        })
    }

    /// Build with the default transport candidates (fetch, legacy, beacon).
    ///
    /// May run before the Tokio runtime starts; requests still need one.
    pub fn from_config(config: NetworkConfig) -> Result<Self, NetworkError> {
        let selector = TransportSelector::from_config(&config)?;
        Self::new(config, selector)
    }

    pub fn namespace(&self) -> &'static str {
        Self::NAMESPACE
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.inner.config
    }

    pub fn selector(&self) -> &TransportSelector {
        &self.inner.selector
    }

    /// Register the host lifecycle. Allowed exactly once.
    pub fn register(&self, lifecycle: Arc<dyn Lifecycle>) -> Result<(), NetworkError> {
        self.inner
            .lifecycle
            .set(lifecycle)
            .map_err(|_| NetworkError::LifecycleAlreadyRegistered)
    }

    pub fn is_registered(&self) -> bool {
        self.inner.lifecycle.get().is_some()
    }

    /// Create a request whose dispatch waits for [`Request::send`].
    ///
    /// Fails with `LifecycleNotRegistered` before [`Network::register`], and
    /// with `ConfigurationError` outside a Tokio runtime.
    pub fn new_request(&self, beacon: bool) -> Result<Request, NetworkError> {
        let lifecycle = self
            .inner
            .lifecycle
            .get()
            .cloned()
            .ok_or(NetworkError::LifecycleNotRegistered)?;
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
            NetworkError::ConfigurationError(
                "Requests can only be created inside a Tokio runtime".to_string(),
            )
        })?;

        let id = Uuid::new_v4();
        let payload = PayloadHandle::new(beacon);
        let (gate_tx, gate_rx) = oneshot::channel();
        let (response_tx, response_rx) = oneshot::channel();
        let (complete_tx, complete_rx) = oneshot::channel();
        let response = SharedOutcome::from_receiver(response_rx);
        let complete = SharedOutcome::from_receiver(complete_rx);

        let job = RequestJob {
            url: self.inner.config.endpoint(beacon),
            beacon,
            payload: payload.clone(),
            response: response.clone(),
            lifecycle,
            selector: self.inner.selector.clone(),
        };
        let action = if beacon { COLLECT_ACTION } else { INTERACT_ACTION };
        let span = tracing::info_span!("edge_collect.request", request = %id, action, beacon);
        runtime.spawn(driver::drive(job, gate_rx, response_tx, complete_tx).instrument(span));

        Ok(Request::new(id, beacon, payload, response, complete, gate_tx))
    }
}

impl std::fmt::Debug for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Network")
            .field("config", &self.inner.config)
            .field("selector", &self.inner.selector)
            .field("registered", &self.is_registered())
            .finish()
    }
}
