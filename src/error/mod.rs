//! Error Handling Module
//!
//! Core error type for the network layer (`NetworkError`, `ErrorCategory`),
//! helper constructors/accessors and conversions from the HTTP and JSON stacks.
//!
//! # Example
//!
//! ```rust,ignore
//! use edge_collect::error::{ErrorCategory, NetworkError};
//!
//! let error = NetworkError::transport_status(500, Some("err".into()));
//! assert_eq!(error.category(), ErrorCategory::Transport);
//! assert_eq!(error.status(), Some(500));
//! ```

mod conversions;
pub mod helpers;
pub mod types;

pub use types::*;
