//! Chained response stream.

use futures_util::Stream;
use std::pin::Pin;

use crate::error::NetworkError;
use crate::transport::RawResponse;

/// One body of a chained response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseLink {
    /// Zero-based position in the chain.
    pub index: usize,
    pub body: String,
    /// Whether another link follows this one.
    pub has_continuation: bool,
}

/// Lazy, non-restartable stream over the links of a response.
pub type ResponseChain = Pin<Box<dyn Stream<Item = Result<ResponseLink, NetworkError>> + Send>>;

/// Turn a raw response into the stream of its links.
///
/// A continuation is awaited only when the next item is polled, so a
/// consumer that stops early never waits on links it does not want. A failed
/// continuation is yielded once and ends the stream.
pub fn response_chain(first: RawResponse) -> ResponseChain {
    Box::pin(async_stream::stream! {
        let mut next = Some(first);
        let mut index = 0;
        while let Some(RawResponse { body, continuation }) = next.take() {
            yield Ok(ResponseLink {
                index,
                body,
                has_continuation: continuation.is_some(),
            });
            index += 1;

            if let Some(continuation) = continuation {
                match continuation.await {
                    Ok(raw) => next = Some(raw),
                    Err(e) => yield Err(e),
                }
            }
        }
    })
}
