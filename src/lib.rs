//! edge-collect
//!
//! Network transport and streamed-response layer for event-collection
//! clients: batches events into a payload, posts it to the collection edge
//! through the best available transport, and hands every fragment of the
//! (possibly chained) response back to the host in order.
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod network;
pub mod observability;
pub mod payload;
pub mod streaming;
pub mod transport;

pub use config::{BeaconConfig, HttpConfig, NetworkConfig, NetworkConfigBuilder};
pub use error::{ErrorCategory, NetworkError};
pub use lifecycle::{BeforeSendContext, Lifecycle, LoggingLifecycle, NoopLifecycle};
pub use network::{CompletionFuture, CompletionSummary, Network, Request, ResponseFuture};
pub use payload::{Payload, PayloadHandle};
pub use streaming::{ResponseEnvelope, ResponseFragment, ResponseLink};
pub use transport::{RawResponse, TransportKind, TransportSelector, TransportStrategy};

/// Commonly used types.
pub mod prelude {
    pub use crate::config::NetworkConfig;
    pub use crate::error::NetworkError;
    pub use crate::lifecycle::{BeforeSendContext, Lifecycle};
    pub use crate::network::{CompletionSummary, Network, Request};
    pub use crate::payload::PayloadHandle;
    pub use crate::transport::{RawResponse, TransportKind, TransportStrategy};
}
