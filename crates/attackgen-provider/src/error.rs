//! Error types for provider configuration and model discovery

use thiserror::Error;

/// The model-listing service could not be used
///
/// This is the only runtime failure of the session model. The store turns it
/// into an [`Advisory`](crate::Advisory) at the call site; it is never fatal.
#[derive(Debug, Error)]
#[error("model provider unavailable at {endpoint}: {cause}")]
pub struct ProviderUnavailable {
    /// URL that was queried
    pub endpoint: String,
    /// What went wrong
    #[source]
    pub cause: UnavailableCause,
}

impl ProviderUnavailable {
    pub(crate) fn new(endpoint: impl Into<String>, cause: UnavailableCause) -> Self {
        Self {
            endpoint: endpoint.into(),
            cause,
        }
    }
}

/// Why a discovery request failed
#[derive(Debug, Error)]
pub enum UnavailableCause {
    /// Connection refused, DNS failure or other transport error
    #[error("connection failed: {0}")]
    Connect(String),
    /// The request timed out
    #[error("request timed out")]
    Timeout,
    /// The service answered with a non-2xx status
    #[error("status {0}: {1}")]
    Status(u16, String),
    /// The body was not the expected model listing
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Errors raised while building a discovery client
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Invalid base URL configuration
    #[error("invalid base_url: {0}")]
    InvalidBaseUrl(String),
    /// The HTTP client could not be built
    #[error("http client error: {0}")]
    Client(String),
}
