//! HTTP client builder utilities
//!
//! Client construction and the shared POST execution used by the fetch and
//! legacy adapters.

use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect::Policy;

use super::RawResponse;
use crate::config::HttpConfig;
use crate::error::NetworkError;

pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";
pub(crate) const BEACON_CONTENT_TYPE: &str = "text/plain; charset=UTF-8";

/// Build the rich HTTP client from `HttpConfig`.
///
/// Redirects are not followed: a 3xx from the collection edge is reported as
/// a transport error.
pub fn build_http_client_from_config(config: &HttpConfig) -> Result<reqwest::Client, NetworkError> {
    let mut builder = reqwest::Client::builder().redirect(Policy::none());

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(connect_timeout) = config.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }

    if let Some(proxy_url) = &config.proxy {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| NetworkError::ConfigurationError(format!("Invalid proxy URL: {e}")))?;
        builder = builder.proxy(proxy);
    }

    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent);
    }

    if !config.headers.is_empty() {
        builder = builder.default_headers(header_map(config)?);
    }

    builder
        .build()
        .map_err(|e| NetworkError::ConfigurationError(format!("Failed to create HTTP client: {e}")))
}

/// Build the minimal HTTP/1.1 client: only timeouts and user agent apply.
pub fn build_legacy_client(config: &HttpConfig) -> Result<reqwest::Client, NetworkError> {
    let mut builder = reqwest::Client::builder()
        .http1_only()
        .redirect(Policy::none());

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(connect_timeout) = config.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }
    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent);
    }

    builder.build().map_err(|e| {
        NetworkError::ConfigurationError(format!("Failed to create legacy HTTP client: {e}"))
    })
}

fn header_map(config: &HttpConfig) -> Result<HeaderMap, NetworkError> {
    let mut headers = HeaderMap::new();
    for (k, v) in &config.headers {
        let name = HeaderName::from_bytes(k.as_bytes()).map_err(|e| {
            NetworkError::ConfigurationError(format!("Invalid header name '{k}': {e}"))
        })?;
        let value = HeaderValue::from_str(v).map_err(|e| {
            NetworkError::ConfigurationError(format!("Invalid header value for '{k}': {e}"))
        })?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// POST a JSON body and map the reply onto `RawResponse`.
pub(crate) async fn execute_json_post(
    client: &reqwest::Client,
    url: &str,
    body: String,
) -> Result<RawResponse, NetworkError> {
    let resp = client
        .post(url)
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .header(CACHE_CONTROL, "no-cache")
        .body(body)
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(NetworkError::transport_status(status.as_u16(), Some(text)));
    }

    if status == reqwest::StatusCode::NO_CONTENT {
        return Ok(RawResponse::empty());
    }

    let text = resp.text().await?;
    Ok(RawResponse::new(text))
}
