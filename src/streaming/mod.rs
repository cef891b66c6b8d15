//! Streaming Module
//!
//! Parsing of response envelopes and the lazy stream over a chained
//! response (one raw body per link).

mod chain;
mod envelope;

pub use chain::{ResponseChain, ResponseLink, response_chain};
pub use envelope::{ResponseEnvelope, ResponseFragment};
