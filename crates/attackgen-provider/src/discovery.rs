//! Model discovery against a local Ollama service
//!
//! Ollama lists its installed models at `GET /api/tags`:
//!
//! ```json
//! {"models": [{"name": "llama2:latest", "size": 3825819519, ...}]}
//! ```
//!
//! Only the `name` of each entry is kept, in response order.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::{DiscoveryError, ProviderUnavailable, UnavailableCause};

/// Where a stock Ollama install listens
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Anything that can list the model names a local provider has installed
#[async_trait]
pub trait ModelSource: Send + Sync {
    /// Base URL of the service; generation requests go here too
    fn base_url(&self) -> &Url;

    /// Fetch the installed model names, in the order the service reports them
    async fn list_models(&self) -> Result<Vec<String>, ProviderUnavailable>;
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<ModelDescriptor>,
}

#[derive(Debug, Deserialize)]
struct ModelDescriptor {
    #[serde(default)]
    name: Option<String>,
}

/// HTTP client for the Ollama `/api/tags` endpoint
#[derive(Debug, Clone)]
pub struct OllamaDiscoveryClient {
    http: reqwest::Client,
    base_url: Url,
}

impl OllamaDiscoveryClient {
    /// Create a client for the given base URL
    ///
    /// No timeout is configured beyond the HTTP client's default and the
    /// request is never retried.
    #[instrument]
    pub fn new(base_url_raw: &str) -> Result<Self, DiscoveryError> {
        let base_url = sanitize_base_url(base_url_raw)?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| DiscoveryError::Client(e.to_string()))?;
        debug!(%base_url, "Created Ollama discovery client");
        Ok(Self { http, base_url })
    }

    /// Client for [`DEFAULT_OLLAMA_URL`]
    pub fn local() -> Result<Self, DiscoveryError> {
        Self::new(DEFAULT_OLLAMA_URL)
    }

    /// The full listing URL, `{base}/api/tags`
    pub fn tags_url(&self) -> Url {
        join_path(&self.base_url, "api/tags")
    }

    /// Query the service for its installed models
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn discover_models(&self) -> Result<Vec<String>, ProviderUnavailable> {
        let url = self.tags_url();
        let endpoint = url.to_string();

        info!(%url, "Fetching installed models");

        let resp = self.http.get(url).send().await.map_err(|e| {
            let cause = if e.is_timeout() {
                UnavailableCause::Timeout
            } else {
                UnavailableCause::Connect(e.to_string())
            };
            ProviderUnavailable::new(endpoint.clone(), cause)
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            let cause = if e.is_timeout() {
                UnavailableCause::Timeout
            } else {
                UnavailableCause::Connect(e.to_string())
            };
            ProviderUnavailable::new(endpoint.clone(), cause)
        })?;

        if !status.is_success() {
            return Err(ProviderUnavailable::new(
                endpoint,
                UnavailableCause::Status(status.as_u16(), truncate(&body, 400)),
            ));
        }

        let names = parse_tags_response(&body)
            .map_err(|cause| ProviderUnavailable::new(endpoint, cause))?;

        info!(model_count = names.len(), "Successfully discovered models");
        Ok(names)
    }
}

#[async_trait]
impl ModelSource for OllamaDiscoveryClient {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn list_models(&self) -> Result<Vec<String>, ProviderUnavailable> {
        self.discover_models().await
    }
}

fn parse_tags_response(body: &str) -> Result<Vec<String>, UnavailableCause> {
    let parsed: TagsResponse =
        serde_json::from_str(body).map_err(|e| UnavailableCause::Malformed(e.to_string()))?;

    let total = parsed.models.len();
    let names: Vec<String> = parsed
        .models
        .into_iter()
        .filter_map(|m| m.name)
        .collect();

    let skipped = total - names.len();
    if skipped > 0 {
        warn!(skipped, "Ignoring model entries without a name");
    }
    Ok(names)
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &s[..end])
}

/// Sanitizes and normalizes a discovery base URL
///
/// Rules:
/// - Trims whitespace
/// - Rejects control chars / newlines
/// - Parses as URL
/// - Allows http for loopback hosts only; otherwise requires https
/// - Drops query, fragment and trailing slashes
pub fn sanitize_base_url(input: &str) -> Result<Url, DiscoveryError> {
    let raw = input.trim();
    if raw.is_empty() {
        return Err(DiscoveryError::InvalidBaseUrl("empty".to_string()));
    }
    if raw.chars().any(|c| c.is_control()) {
        return Err(DiscoveryError::InvalidBaseUrl(
            "contains control characters".to_string(),
        ));
    }
    let mut url = Url::parse(raw).map_err(|e| DiscoveryError::InvalidBaseUrl(e.to_string()))?;

    if !url.username().is_empty() || url.password().is_some() {
        return Err(DiscoveryError::InvalidBaseUrl(
            "must not include userinfo".to_string(),
        ));
    }

    url.set_query(None);
    url.set_fragment(None);

    let host = url.host_str().unwrap_or_default().to_lowercase();
    let is_local =
        host == "localhost" || host == "127.0.0.1" || host == "::1" || host == "[::1]";

    match url.scheme() {
        "https" => {}
        "http" if is_local => {}
        other => {
            return Err(DiscoveryError::InvalidBaseUrl(format!(
                "unsupported scheme: {other}"
            )))
        }
    }

    let path = url.path().trim_end_matches('/').to_string();
    url.set_path(&path);
    Ok(url)
}

fn join_path(base: &Url, segment: &str) -> Url {
    let mut url = base.clone();
    let mut path = url.path().to_string();
    if !path.ends_with('/') {
        path.push('/');
    }
    path.push_str(segment);
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);
    url
}
