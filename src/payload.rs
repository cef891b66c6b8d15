//! Request payload
//!
//! An ordered list of event records plus the send-mode flag. The payload is
//! shared between the caller, the pre-send hook and the request driver via
//! [`PayloadHandle`]. Once the request is sent only the pre-send hook may
//! still add events, and the payload freezes when that hook returns.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::NetworkError;

/// Wire shape of a serialized payload.
#[derive(Serialize)]
struct PayloadBody<'a> {
    events: &'a [serde_json::Value],
}

/// Ordered event records for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    events: Vec<serde_json::Value>,
    beacon: bool,
    sealed: bool,
    frozen: bool,
}

impl Payload {
    pub fn new(beacon: bool) -> Self {
        Self {
            events: Vec::new(),
            beacon,
            sealed: false,
            frozen: false,
        }
    }

    /// Append one event record.
    pub fn add_event<T: Serialize + ?Sized>(&mut self, record: &T) -> Result<(), NetworkError> {
        if self.frozen {
            return Err(NetworkError::PayloadFrozen);
        }
        let value = serde_json::to_value(record)?;
        self.events.push(value);
        Ok(())
    }

    /// Canonical wire body, `{"events":[...]}` in insertion order.
    pub fn serialize(&self) -> Result<String, NetworkError> {
        Ok(serde_json::to_string(&PayloadBody {
            events: &self.events,
        })?)
    }

    pub fn events(&self) -> &[serde_json::Value] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn is_beacon(&self) -> bool {
        self.beacon
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Close the payload to everyone but the pre-send hook.
    pub(crate) fn seal(&mut self) {
        self.sealed = true;
    }

    pub(crate) fn freeze(&mut self) {
        self.sealed = true;
        self.frozen = true;
    }
}

/// Shared handle to a request's payload.
///
/// Clones refer to the same payload. Handles given to callers stop accepting
/// events as soon as the request is sent; the handle given to the pre-send
/// hook keeps accepting them until the hook returns.
#[derive(Debug, Clone)]
pub struct PayloadHandle {
    inner: Arc<Mutex<Payload>>,
    hook_writer: bool,
}

impl PayloadHandle {
    pub fn new(beacon: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Payload::new(beacon))),
            hook_writer: false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Payload> {
        // A panic while holding the lock cannot leave a half-written event.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append one event record; fails with `PayloadFrozen` once this handle
    /// may no longer write.
    pub fn add_event<T: Serialize + ?Sized>(&self, record: &T) -> Result<(), NetworkError> {
        let mut payload = self.lock();
        if payload.sealed && !self.hook_writer {
            return Err(NetworkError::PayloadFrozen);
        }
        payload.add_event(record)
    }

    pub fn serialize(&self) -> Result<String, NetworkError> {
        self.lock().serialize()
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Payload {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn is_beacon(&self) -> bool {
        self.lock().is_beacon()
    }

    /// Whether this handle no longer accepts events.
    pub fn is_frozen(&self) -> bool {
        let payload = self.lock();
        payload.frozen || (payload.sealed && !self.hook_writer)
    }

    /// Whether both handles point at the same payload.
    pub fn ptr_eq(&self, other: &PayloadHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Handle that may still write after [`PayloadHandle::seal`].
    pub(crate) fn hook_writer(&self) -> PayloadHandle {
        PayloadHandle {
            inner: self.inner.clone(),
            hook_writer: true,
        }
    }

    pub(crate) fn seal(&self) {
        self.lock().seal();
    }

    /// Freeze and serialize in one step so no event can slip in between.
    pub(crate) fn freeze_and_serialize(&self) -> Result<String, NetworkError> {
        let mut payload = self.lock();
        payload.freeze();
        payload.serialize()
    }
}
