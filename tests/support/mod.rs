//! Shared fixtures for network integration tests: scripted transports and a
//! recording lifecycle.
#![allow(dead_code)]

use async_trait::async_trait;
use edge_collect::prelude::*;
use edge_collect::transport::TransportSelector;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

type Reply = Box<dyn Fn(usize) -> Result<RawResponse, NetworkError> + Send + Sync>;

/// In-memory transport that records every call and answers from a script.
pub struct ScriptedTransport {
    kind: TransportKind,
    capable: bool,
    reply: Reply,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedTransport {
    pub fn new<F>(kind: TransportKind, reply: F) -> Arc<Self>
    where
        F: Fn(usize) -> Result<RawResponse, NetworkError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            kind,
            capable: true,
            reply: Box::new(reply),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// General transport answering every call with `body`.
    pub fn replying(body: &str) -> Arc<Self> {
        let body = body.to_string();
        Self::new(TransportKind::Fetch, move |_| Ok(RawResponse::new(body.clone())))
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TransportStrategy for ScriptedTransport {
    fn kind(&self) -> TransportKind {
        self.kind
    }

    fn can_handle(&self, _url: &str, _body: &str, response_required: bool) -> bool {
        self.capable && !(self.kind == TransportKind::Beacon && response_required)
    }

    async fn call(&self, url: &str, body: String) -> Result<RawResponse, NetworkError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((url.to_string(), body));
            calls.len() - 1
        };
        (self.reply)(n)
    }
}

/// Lifecycle that records what it is handed.
#[derive(Default)]
pub struct RecordingLifecycle {
    pub fragments: Mutex<Vec<(String, String, Value)>>,
    pub contexts: Mutex<Vec<BeforeSendContext>>,
    /// Event appended to the payload by the before-send hook.
    pub extra_event: Option<Value>,
    pub reject_before_send: bool,
}

impl RecordingLifecycle {
    pub fn fragments(&self) -> Vec<(String, String, Value)> {
        self.fragments.lock().unwrap().clone()
    }

    pub fn fragment_ids(&self) -> Vec<String> {
        self.fragments()
            .into_iter()
            .map(|(_, _, payload)| payload["id"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

#[async_trait]
impl Lifecycle for RecordingLifecycle {
    async fn on_before_send(&self, ctx: BeforeSendContext) -> Result<(), NetworkError> {
        if let Some(event) = &self.extra_event {
            ctx.payload.add_event(event)?;
        }
        self.contexts.lock().unwrap().push(ctx);
        if self.reject_before_send {
            return Err(NetworkError::ConfigurationError("consent missing".into()));
        }
        Ok(())
    }

    async fn on_response_fragment(
        &self,
        request_id: &str,
        fragment_type: &str,
        payload: &Value,
    ) -> Result<(), NetworkError> {
        self.fragments.lock().unwrap().push((
            request_id.to_string(),
            fragment_type.to_string(),
            payload.clone(),
        ));
        Ok(())
    }
}

pub fn config() -> NetworkConfig {
    NetworkConfig::builder()
        .collection_url("https://example.com/v1")
        .property_id("p1")
        .build()
        .unwrap()
}

/// Network over the given candidates, with `lifecycle` registered.
pub fn network(
    candidates: Vec<Arc<dyn TransportStrategy>>,
    lifecycle: Arc<RecordingLifecycle>,
) -> Network {
    let config = config();
    let selector = TransportSelector::new(candidates, &config).unwrap();
    let network = Network::new(config, selector).unwrap();
    network.register(lifecycle).unwrap();
    network
}

/// Envelope body whose fragments are `mytype` records with the given ids.
pub fn envelope(request_id: &str, ids: &[&str]) -> String {
    let handle: Vec<Value> = ids
        .iter()
        .map(|id| json!({"type": "mytype", "payload": {"id": id}}))
        .collect();
    json!({"requestId": request_id, "handle": handle}).to_string()
}

/// Chain the bodies: each link's continuation resolves to the next one.
pub fn chain(bodies: Vec<String>) -> RawResponse {
    let mut links = bodies.into_iter().rev();
    let mut raw = RawResponse::new(links.next().unwrap_or_default());
    for body in links {
        let next = raw;
        raw = RawResponse::new(body).with_continuation(async move { Ok(next) });
    }
    raw
}

pub fn candidates(transports: &[&Arc<ScriptedTransport>]) -> Vec<Arc<dyn TransportStrategy>> {
    transports
        .iter()
        .map(|t| Arc::clone(*t) as Arc<dyn TransportStrategy>)
        .collect()
}
