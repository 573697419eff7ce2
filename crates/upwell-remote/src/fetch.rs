use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use thiserror::Error;

use crate::descriptor::RemoteDescriptor;

/// Owned parameters of one update query.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub endpoint: String,
    pub plugin_id: String,
    pub slug: String,
    pub installed_version: String,
    pub referrer: Option<String>,
    pub secret: Option<String>,
    /// JSON-encoded environment facts; an empty object when telemetry is
    /// disabled.
    pub telemetry: serde_json::Value,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("update query failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("update query answered HTTP {status}{body_snippet}")]
    HttpStatus {
        status: StatusCode,
        body_snippet: String,
    },
    #[error("update response could not be decoded: {0}")]
    Parse(#[source] reqwest::Error),
}

/// Where update descriptors come from.
///
/// The production implementation is [`HttpSource`]; tests substitute fakes.
#[async_trait]
pub trait DescriptorSource: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<RemoteDescriptor, FetchError>;
}

/// Fixed extensibility blob sent with every query so the service can key
/// behavior off the client generation without a contract change.
#[must_use]
pub fn extension_meta() -> serde_json::Value {
    serde_json::json!({
        "client": "upwell",
        "client_version": env!("CARGO_PKG_VERSION"),
    })
}

pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

#[async_trait]
impl DescriptorSource for HttpSource {
    async fn fetch(&self, request: &FetchRequest) -> Result<RemoteDescriptor, FetchError> {
        fetch_descriptor(&self.client, request).await
    }
}

/// Perform the one GET an update check is allowed: no retry, no backoff,
/// whatever timeout the client was built with.
///
/// Success requires HTTP 200 exactly and a decodable descriptor body.
///
/// # Errors
/// Returns an error when the request fails, the service answers anything but
/// HTTP 200, or the body does not decode.
pub async fn fetch_descriptor(
    client: &reqwest::Client,
    request: &FetchRequest,
) -> Result<RemoteDescriptor, FetchError> {
    let telemetry = request.telemetry.to_string();
    let meta = extension_meta().to_string();

    let mut get = client
        .get(&request.endpoint)
        .query(&[
            ("id", request.plugin_id.as_str()),
            ("slug", request.slug.as_str()),
            ("version", request.installed_version.as_str()),
            ("referrer", request.referrer.as_deref().unwrap_or("")),
            ("telemetry", telemetry.as_str()),
            ("meta", meta.as_str()),
        ])
        .header(ACCEPT, "application/json");
    if let Some(secret) = request.secret.as_deref() {
        get = get.bearer_auth(secret);
    }

    let response = get.send().await.map_err(FetchError::Request)?;

    if response.status() != StatusCode::OK {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let body_snippet = if body.is_empty() {
            String::new()
        } else {
            format!(": {}", body.chars().take(160).collect::<String>())
        };
        return Err(FetchError::HttpStatus {
            status,
            body_snippet,
        });
    }

    response.json().await.map_err(FetchError::Parse)
}
