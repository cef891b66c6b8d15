//! Composite transport selection.

use std::fmt;
use std::sync::Arc;

use super::{
    BeaconTransport, FetchTransport, LegacyTransport, RawResponse, TransportKind,
    TransportStrategy,
};
use crate::config::NetworkConfig;
use crate::error::NetworkError;

/// Picks, once, the adapter used for regular sends and the adapter used for
/// beacon sends.
///
/// Candidates are probed in the order given. The general adapter is the
/// first one able to deliver a request whose response is required; the
/// beacon adapter is the first `TransportKind::Beacon` candidate able to
/// deliver without a response. Nothing is re-probed afterwards, and a failed
/// call never falls back to another adapter.
#[derive(Clone)]
pub struct TransportSelector {
    general: Arc<dyn TransportStrategy>,
    beacon: Option<Arc<dyn TransportStrategy>>,
}

impl TransportSelector {
    /// Select among `candidates` (highest priority first), probing against
    /// the endpoints `config` produces.
    pub fn new(
        candidates: Vec<Arc<dyn TransportStrategy>>,
        config: &NetworkConfig,
    ) -> Result<Self, NetworkError> {
        let interact_url = config.endpoint(false);
        let collect_url = config.endpoint(true);

        let general = candidates
            .iter()
            .find(|c| c.can_handle(&interact_url, "", true))
            .cloned()
            .ok_or_else(|| {
                NetworkError::UnsupportedTransport(format!(
                    "none of [{}] can deliver to {interact_url}",
                    kinds(&candidates)
                ))
            })?;

        let beacon = candidates
            .iter()
            .find(|c| c.kind() == TransportKind::Beacon && c.can_handle(&collect_url, "", false))
            .cloned();

        tracing::debug!(
            target: "edge_collect::transport",
            general = %general.kind(),
            beacon = beacon.as_ref().map(|b| b.kind().to_string()).unwrap_or_else(|| "none".to_string()),
            "transport selected"
        );

        Ok(Self { general, beacon })
    }

    /// Default candidates: fetch, then legacy, then beacon.
    pub fn from_config(config: &NetworkConfig) -> Result<Self, NetworkError> {
        let candidates: Vec<Arc<dyn TransportStrategy>> = vec![
            Arc::new(FetchTransport::new(&config.http)),
            Arc::new(LegacyTransport::new(&config.http)),
            Arc::new(BeaconTransport::new(&config.http, config.beacon.clone())),
        ];
        Self::new(candidates, config)
    }

    pub fn general_kind(&self) -> TransportKind {
        self.general.kind()
    }

    pub fn beacon_kind(&self) -> Option<TransportKind> {
        self.beacon.as_ref().map(|b| b.kind())
    }

    /// Adapter used for a send in the given mode.
    pub fn strategy_for(&self, beacon: bool) -> &Arc<dyn TransportStrategy> {
        match (&self.beacon, beacon) {
            (Some(strategy), true) => strategy,
            _ => &self.general,
        }
    }

    /// Deliver `body` through the cached adapter for this mode.
    pub async fn call(
        &self,
        url: &str,
        body: String,
        beacon: bool,
    ) -> Result<RawResponse, NetworkError> {
        self.strategy_for(beacon).call(url, body).await
    }
}

impl fmt::Debug for TransportSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportSelector")
            .field("general", &self.general_kind())
            .field("beacon", &self.beacon_kind())
            .finish()
    }
}

fn kinds(candidates: &[Arc<dyn TransportStrategy>]) -> String {
    candidates
        .iter()
        .map(|c| c.kind().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
