//! Host lifecycle hooks
//!
//! The host registers one [`Lifecycle`] with the network component. It is
//! told about every request right before dispatch and receives every
//! response fragment, in order.

use async_trait::async_trait;

use crate::error::NetworkError;
use crate::network::ResponseFuture;
use crate::payload::PayloadHandle;

/// What the pre-send hook gets to see.
#[derive(Clone)]
pub struct BeforeSendContext {
    /// Still accepts events while the hook runs, even though the caller's
    /// handles are already sealed; frozen once the hook returns.
    pub payload: PayloadHandle,
    /// Resolves with the first response link. Awaiting it inside the hook
    /// never completes, since dispatch waits for the hook.
    pub response: ResponseFuture,
    pub beacon: bool,
}

impl std::fmt::Debug for BeforeSendContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeforeSendContext")
            .field("payload", &self.payload)
            .field("beacon", &self.beacon)
            .finish_non_exhaustive()
    }
}

/// Host callbacks driven by the network component.
///
/// Both hooks are awaited: a request is not dispatched before
/// `on_before_send` returns, and the next fragment is not delivered before
/// `on_response_fragment` returns for the previous one.
#[async_trait]
pub trait Lifecycle: Send + Sync {
    /// Inspect or extend the payload before it freezes. An error cancels the
    /// request before any network call.
    async fn on_before_send(&self, _ctx: BeforeSendContext) -> Result<(), NetworkError> {
        Ok(())
    }

    /// Handle one response fragment. An error is logged and delivery
    /// continues with the next fragment.
    async fn on_response_fragment(
        &self,
        _request_id: &str,
        _fragment_type: &str,
        _payload: &serde_json::Value,
    ) -> Result<(), NetworkError> {
        Ok(())
    }
}

/// Lifecycle that ignores every hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLifecycle;

impl Lifecycle for NoopLifecycle {}

/// A simple logging lifecycle backed by `tracing` (no payload contents).
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLifecycle;

#[async_trait]
impl Lifecycle for LoggingLifecycle {
    async fn on_before_send(&self, ctx: BeforeSendContext) -> Result<(), NetworkError> {
        tracing::debug!(target: "edge_collect::lifecycle", events = ctx.payload.len(), beacon = ctx.beacon, "before send");
        Ok(())
    }

    async fn on_response_fragment(
        &self,
        request_id: &str,
        fragment_type: &str,
        _payload: &serde_json::Value,
    ) -> Result<(), NetworkError> {
        tracing::debug!(target: "edge_collect::lifecycle", request_id = %request_id, fragment_type = %fragment_type, "response fragment");
        Ok(())
    }
}
