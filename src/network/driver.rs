//! Per-request driver.
//!
//! One driver task per request walks the lifecycle
//! `CREATED -> BEFORE_SEND -> DISPATCHED -> STREAMING* -> COMPLETE | FAILED`
//! and publishes the response and completion outcomes.

use futures_util::StreamExt;
use std::sync::Arc;
use tokio::sync::oneshot;

use super::request::{CompletionSummary, ResponseFuture};
use crate::error::NetworkError;
use crate::lifecycle::{BeforeSendContext, Lifecycle};
use crate::payload::PayloadHandle;
use crate::streaming::{ResponseEnvelope, ResponseLink, response_chain};
use crate::transport::{RawResponse, TransportSelector};

type ResponseSender = oneshot::Sender<Result<ResponseLink, NetworkError>>;
type CompletionSender = oneshot::Sender<Result<CompletionSummary, NetworkError>>;

/// Everything the driver needs, captured at request creation.
pub(crate) struct RequestJob {
    pub url: String,
    pub beacon: bool,
    pub payload: PayloadHandle,
    pub response: ResponseFuture,
    pub lifecycle: Arc<dyn Lifecycle>,
    pub selector: Arc<TransportSelector>,
}

pub(crate) async fn drive(
    job: RequestJob,
    gate: oneshot::Receiver<()>,
    response_tx: ResponseSender,
    complete_tx: CompletionSender,
) {
    if gate.await.is_err() {
        tracing::debug!(target: "edge_collect::network", "request dropped before send");
        return;
    }

    let ctx = BeforeSendContext {
        payload: job.payload.hook_writer(),
        response: job.response.clone(),
        beacon: job.beacon,
    };
    if let Err(e) = job.lifecycle.on_before_send(ctx).await {
        let e = match e {
            NetworkError::BeforeSendHookError(_) => e,
            other => NetworkError::BeforeSendHookError(other.to_string()),
        };
        tracing::warn!(target: "edge_collect::network", error = %e, "before-send hook rejected request");
        fail(response_tx, complete_tx, e);
        return;
    }

    let body = match job.payload.freeze_and_serialize() {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(target: "edge_collect::network", error = %e, "failed to serialize payload");
            fail(response_tx, complete_tx, e);
            return;
        }
    };

    tracing::debug!(target: "edge_collect::network", url = %job.url, bytes = body.len(), "dispatching request");
    let raw = match job.selector.call(&job.url, body, job.beacon).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(target: "edge_collect::network", url = %job.url, error = %e, "request failed");
            fail(response_tx, complete_tx, e);
            return;
        }
    };

    let _ = response_tx.send(Ok(ResponseLink {
        index: 0,
        body: raw.body.clone(),
        has_continuation: raw.has_continuation(),
    }));

    if job.beacon {
        // Beacon replies carry nothing to dispatch.
        let _ = complete_tx.send(Ok(CompletionSummary {
            links: 1,
            ..Default::default()
        }));
        return;
    }

    let outcome = dispatch_chain(job.lifecycle.as_ref(), raw).await;
    if let Err(e) = &outcome {
        tracing::warn!(target: "edge_collect::network", url = %job.url, error = %e, "response chain failed");
    }
    let _ = complete_tx.send(outcome);
}

fn fail(response_tx: ResponseSender, complete_tx: CompletionSender, error: NetworkError) {
    let _ = response_tx.send(Err(error.clone()));
    let _ = complete_tx.send(Err(error));
}

/// Drain the response chain, handing every fragment to the host in order.
///
/// A body that does not parse ends the chain without failing it. Fragment
/// hook errors are logged and counted; delivery continues.
pub(crate) async fn dispatch_chain(
    lifecycle: &dyn Lifecycle,
    raw: RawResponse,
) -> Result<CompletionSummary, NetworkError> {
    let mut summary = CompletionSummary::default();
    let mut chain = response_chain(raw);

    while let Some(link) = chain.next().await {
        let link = link?;
        summary.links += 1;

        let envelope = match ResponseEnvelope::parse(&link.body) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(target: "edge_collect::streaming", link = link.index, error = %e, "discarding unparseable response body");
                summary.terminated_by_parse_error = true;
                break;
            }
        };

        let ResponseEnvelope { request_id, handle } = envelope;
        for fragment in handle {
            tracing::trace!(target: "edge_collect::streaming", request_id = %request_id, fragment_type = %fragment.fragment_type, "dispatching fragment");
            summary.fragments += 1;
            if let Err(e) = lifecycle
                .on_response_fragment(&request_id, &fragment.fragment_type, &fragment.payload)
                .await
            {
                let e = NetworkError::FragmentHookError {
                    request_id: request_id.clone(),
                    fragment_type: fragment.fragment_type.clone(),
                    message: e.to_string(),
                };
                tracing::error!(target: "edge_collect::streaming", error = %e, "fragment handler failed");
                summary.hook_failures += 1;
            }
        }
        summary.request_id = Some(request_id);
    }

    Ok(summary)
}
