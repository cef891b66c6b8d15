//! Request handle and its shared outcome futures.

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::error::NetworkError;
use crate::payload::PayloadHandle;
use crate::streaming::ResponseLink;

/// Cloneable future over an outcome published once by the request driver.
pub struct SharedOutcome<T: Clone> {
    inner: Shared<BoxFuture<'static, Result<T, NetworkError>>>,
}

impl<T> SharedOutcome<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn from_receiver(rx: oneshot::Receiver<Result<T, NetworkError>>) -> Self {
        let inner = async move {
            rx.await.unwrap_or_else(|_| {
                Err(NetworkError::RequestAbandoned(
                    "request was dropped before it completed".to_string(),
                ))
            })
        }
        .boxed()
        .shared();
        Self { inner }
    }

    /// Whether both handles observe the same outcome.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.inner.ptr_eq(&other.inner)
    }

    /// Outcome, if already published and observed.
    pub fn peek(&self) -> Option<&Result<T, NetworkError>> {
        self.inner.peek()
    }
}

impl<T: Clone> Clone for SharedOutcome<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone> Future for SharedOutcome<T> {
    type Output = Result<T, NetworkError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl<T: Clone> fmt::Debug for SharedOutcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedOutcome").finish_non_exhaustive()
    }
}

/// Resolves with the first response link once the transport answered.
pub type ResponseFuture = SharedOutcome<ResponseLink>;

/// Resolves once the whole response chain has been delivered.
pub type CompletionFuture = SharedOutcome<CompletionSummary>;

/// What happened while a request's response was consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionSummary {
    /// `requestId` of the last parsed envelope.
    pub request_id: Option<String>,
    /// Links received, including one that failed to parse.
    pub links: usize,
    /// Fragments handed to the fragment hook.
    pub fragments: usize,
    /// Fragment hook invocations that returned an error.
    pub hook_failures: usize,
    /// Whether a malformed body ended the chain early.
    pub terminated_by_parse_error: bool,
}

/// One outbound exchange.
///
/// Created by `Network::new_request`; nothing is sent until [`Request::send`]
/// is called. Dropping an unsent request abandons it.
pub struct Request {
    id: Uuid,
    beacon: bool,
    payload: PayloadHandle,
    response: ResponseFuture,
    complete: CompletionFuture,
    gate: Mutex<Option<oneshot::Sender<()>>>,
}

impl Request {
    pub(crate) fn new(
        id: Uuid,
        beacon: bool,
        payload: PayloadHandle,
        response: ResponseFuture,
        complete: CompletionFuture,
        gate: oneshot::Sender<()>,
    ) -> Self {
        Self {
            id,
            beacon,
            payload,
            response,
            complete,
            gate: Mutex::new(Some(gate)),
        }
    }

    /// Local correlation id (not the server's `requestId`).
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn beacon(&self) -> bool {
        self.beacon
    }

    pub fn payload(&self) -> &PayloadHandle {
        &self.payload
    }

    pub fn response(&self) -> ResponseFuture {
        self.response.clone()
    }

    pub fn complete(&self) -> CompletionFuture {
        self.complete.clone()
    }

    /// Open the send gate. Only the first call has an effect; it returns
    /// `true`, later calls return `false`.
    ///
    /// From then on [`Request::payload`] rejects events with `PayloadFrozen`;
    /// only the pre-send hook may still add them.
    pub fn send(&self) -> bool {
        let gate = self
            .gate
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        match gate {
            Some(tx) => {
                self.payload.seal();
                // The driver only goes away with the runtime; the outcome
                // futures then report the request as abandoned.
                let _ = tx.send(());
                true
            }
            None => false,
        }
    }

    pub fn is_sent(&self) -> bool {
        self.gate
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_none()
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("id", &self.id)
            .field("beacon", &self.beacon)
            .field("sent", &self.is_sent())
            .finish_non_exhaustive()
    }
}
