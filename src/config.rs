//! Configuration types.
//!
//! `NetworkConfig` carries everything the network component needs at
//! construction time: where events are collected, how the HTTP clients are
//! built and whether beacon delivery is allowed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::NetworkError;

/// Default user agent for outbound requests.
pub const DEFAULT_USER_AGENT: &str = concat!("edge-collect/", env!("CARGO_PKG_VERSION"));

/// Common user-agent quota for beacon payloads.
pub const DEFAULT_BEACON_MAX_BYTES: usize = 64 * 1024;

/// Action segment used for regular sends.
pub const INTERACT_ACTION: &str = "interact";
/// Action segment used for beacon sends.
pub const COLLECT_ACTION: &str = "collect";

/// HTTP configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout
    #[serde(default, with = "duration_option_serde")]
    pub timeout: Option<Duration>,
    /// Connection timeout
    #[serde(default, with = "duration_option_serde")]
    pub connect_timeout: Option<Duration>,
    /// Custom headers added to every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Proxy settings
    #[serde(default)]
    pub proxy: Option<String>,
    /// User agent
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(10)),
            headers: HashMap::new(),
            proxy: None,
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
        }
    }
}

/// Beacon delivery settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeaconConfig {
    /// Whether the dedicated beacon adapter may be selected at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Largest body the beacon adapter accepts.
    #[serde(default = "default_beacon_max_bytes")]
    pub max_payload_bytes: usize,
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_payload_bytes: DEFAULT_BEACON_MAX_BYTES,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_beacon_max_bytes() -> usize {
    DEFAULT_BEACON_MAX_BYTES
}

/// Network component configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Base collection URL, e.g. `https://edge.example.com/v1`.
    pub collection_url: String,
    /// Property the events belong to.
    pub property_id: String,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub beacon: BeaconConfig,
}

impl NetworkConfig {
    /// Returns a builder for constructing `NetworkConfig`
    pub fn builder() -> NetworkConfigBuilder {
        NetworkConfigBuilder::new()
    }

    /// Load the configuration from `EDGE_COLLECT_*` environment variables.
    ///
    /// Required: `EDGE_COLLECT_COLLECTION_URL`, `EDGE_COLLECT_PROPERTY_ID`.
    /// Optional: `EDGE_COLLECT_TIMEOUT_SECS`, `EDGE_COLLECT_BEACON_ENABLED`.
    pub fn from_env() -> Result<Self, NetworkError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, NetworkError> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| {
                NetworkError::ConfigurationError(format!("Missing environment variable {key}"))
            })
        };

        let mut builder = Self::builder()
            .collection_url(required("EDGE_COLLECT_COLLECTION_URL")?)
            .property_id(required("EDGE_COLLECT_PROPERTY_ID")?);

        if let Some(secs) = lookup("EDGE_COLLECT_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|e| {
                NetworkError::ConfigurationError(format!(
                    "Invalid EDGE_COLLECT_TIMEOUT_SECS '{secs}': {e}"
                ))
            })?;
            builder = builder.timeout(Some(Duration::from_secs(secs)));
        }

        if let Some(flag) = lookup("EDGE_COLLECT_BEACON_ENABLED") {
            let enabled = match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(NetworkError::ConfigurationError(format!(
                        "Invalid EDGE_COLLECT_BEACON_ENABLED '{other}'"
                    )));
                }
            };
            builder = builder.beacon_enabled(enabled);
        }

        builder.build()
    }

    /// Check the invariants the rest of the crate relies on.
    pub fn validate(&self) -> Result<(), NetworkError> {
        let url = reqwest::Url::parse(&self.collection_url).map_err(|e| {
            NetworkError::ConfigurationError(format!(
                "Invalid collection URL '{}': {e}",
                self.collection_url
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(NetworkError::ConfigurationError(format!(
                "Unsupported collection URL scheme '{}'",
                url.scheme()
            )));
        }
        if self.property_id.trim().is_empty() {
            return Err(NetworkError::ConfigurationError(
                "Property id must not be empty".to_string(),
            ));
        }
        if self.property_id.contains('/') {
            return Err(NetworkError::ConfigurationError(format!(
                "Property id '{}' must not contain '/'",
                self.property_id
            )));
        }
        Ok(())
    }

    /// Endpoint for one request: `{collection_url}/{property_id}/{interact|collect}`.
    pub fn endpoint(&self, beacon: bool) -> String {
        let action = if beacon { COLLECT_ACTION } else { INTERACT_ACTION };
        format!(
            "{}/{}/{}",
            self.collection_url.trim_end_matches('/'),
            self.property_id,
            action
        )
    }
}

/// Builder for `NetworkConfig`
#[derive(Debug, Clone, Default)]
pub struct NetworkConfigBuilder {
    collection_url: Option<String>,
    property_id: Option<String>,
    http: HttpConfig,
    beacon: BeaconConfig,
}

impl NetworkConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection_url<S: Into<String>>(mut self, url: S) -> Self {
        self.collection_url = Some(url.into());
        self
    }
    pub fn property_id<S: Into<String>>(mut self, property_id: S) -> Self {
        self.property_id = Some(property_id.into());
        self
    }
    pub fn http(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.http.timeout = timeout;
        self
    }
    pub fn connect_timeout(mut self, connect_timeout: Option<Duration>) -> Self {
        self.http.connect_timeout = connect_timeout;
        self
    }
    pub fn user_agent<S: Into<String>>(mut self, user_agent: Option<S>) -> Self {
        self.http.user_agent = user_agent.map(|s| s.into());
        self
    }
    pub fn proxy<S: Into<String>>(mut self, proxy: Option<S>) -> Self {
        self.http.proxy = proxy.map(|s| s.into());
        self
    }
    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.http.headers.insert(key.into(), value.into());
        self
    }
    pub fn beacon_enabled(mut self, enabled: bool) -> Self {
        self.beacon.enabled = enabled;
        self
    }
    pub fn beacon_max_payload_bytes(mut self, max: usize) -> Self {
        self.beacon.max_payload_bytes = max;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<NetworkConfig, NetworkError> {
        let collection_url = self.collection_url.ok_or_else(|| {
            NetworkError::ConfigurationError("Collection URL is required".to_string())
        })?;
        let property_id = self.property_id.ok_or_else(|| {
            NetworkError::ConfigurationError("Property id is required".to_string())
        })?;
        let config = NetworkConfig {
            collection_url: collection_url.trim_end_matches('/').to_string(),
            property_id,
            http: self.http,
            beacon: self.beacon,
        };
        config.validate()?;
        Ok(config)
    }
}

// Durations are stored as whole seconds.
mod duration_option_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => d.as_secs().serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<u64> = Option::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> NetworkConfig {
        NetworkConfig::builder()
            .collection_url("https://example.com/v1")
            .property_id("p1")
            .build()
            .unwrap()
    }

    #[test]
    fn endpoint_uses_interact_for_regular_sends() {
        assert_eq!(config().endpoint(false), "https://example.com/v1/p1/interact");
    }

    #[test]
    fn endpoint_uses_collect_for_beacons() {
        assert_eq!(config().endpoint(true), "https://example.com/v1/p1/collect");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = NetworkConfig::builder()
            .collection_url("https://example.com/v1/")
            .property_id("p1")
            .build()
            .unwrap();
        assert_eq!(config.endpoint(false), "https://example.com/v1/p1/interact");
    }

    #[test]
    fn rejects_invalid_values() {
        let missing = NetworkConfig::builder().property_id("p1").build();
        assert!(matches!(missing, Err(NetworkError::ConfigurationError(_))));

        let bad_scheme = NetworkConfig::builder()
            .collection_url("ftp://example.com")
            .property_id("p1")
            .build();
        assert!(bad_scheme.is_err());

        let bad_property = NetworkConfig::builder()
            .collection_url("https://example.com")
            .property_id("a/b")
            .build();
        assert!(bad_property.is_err());

        let empty_property = NetworkConfig::builder()
            .collection_url("https://example.com")
            .property_id("  ")
            .build();
        assert!(empty_property.is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: NetworkConfig = serde_json::from_str(
            r#"{"collection_url":"https://example.com/v1","property_id":"p1","http":{"timeout":5}}"#,
        )
        .unwrap();
        assert_eq!(config.http.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.http.connect_timeout, None);
        assert!(config.beacon.enabled);
        assert_eq!(config.beacon.max_payload_bytes, DEFAULT_BEACON_MAX_BYTES);
    }

    #[test]
    fn loads_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("EDGE_COLLECT_COLLECTION_URL", "https://example.com/v1"),
            ("EDGE_COLLECT_PROPERTY_ID", "p1"),
            ("EDGE_COLLECT_TIMEOUT_SECS", "7"),
            ("EDGE_COLLECT_BEACON_ENABLED", "false"),
        ]
        .into_iter()
        .collect();
        let config =
            NetworkConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.property_id, "p1");
        assert_eq!(config.http.timeout, Some(Duration::from_secs(7)));
        assert!(!config.beacon.enabled);
    }

    #[test]
    fn lookup_reports_missing_variables() {
        let err = NetworkConfig::from_lookup(|_| None).unwrap_err();
        assert!(err.to_string().contains("EDGE_COLLECT_COLLECTION_URL"));
    }
}
