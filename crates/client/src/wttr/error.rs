//! Weather transport error types.

use std::sync::Arc;

/// Errors from a single request to the weather service.
///
/// Responses in the 2xx–4xx range are not errors: they come back as a
/// [`WeatherResponse`](super::WeatherResponse) and are classified by the
/// resolver.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// The service answered with a 5xx status.
    #[error("server error: {status}")]
    ServerError { status: u16 },

    /// Network error (connection refused, DNS, TLS, body read...).
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Request URL could not be built.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { TransportError::Timeout } else { TransportError::Network(Arc::new(err)) }
    }
}
