//! wttr.in plaintext weather client.
//!
//! ### Specification
//!
//! - **Endpoint**: `GET {base_url}/{city}?format=%C+%t` (condition + temperature)
//! - **City**: normalized (trimmed, lowercased) and percent-encoded as one path segment
//! - **Status handling**: 2xx–4xx are completed responses returned to the caller;
//!   5xx is reported as [`TransportError::ServerError`] without reading the body.
//! - **Timeouts**: none at this layer; the resolver bounds each attempt and drops
//!   the in-flight request when it expires.

pub mod error;
pub mod request;

pub use error::TransportError;
pub use request::{CityError, CityQuery, city_url};

use async_trait::async_trait;
use reqwest::header;
use skycast_core::{AppConfig, Error};
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Default base URL for the weather service.
const DEFAULT_BASE_URL: &str = "https://wttr.in";

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "mcp-weather/0.1";

/// A completed (non-5xx) response from the weather service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

/// Outbound side of a weather lookup.
///
/// Implementations issue exactly one request per call and must be cancel-safe:
/// the resolver drops the future when an attempt times out.
#[async_trait]
pub trait WeatherTransport: Send + Sync {
    /// Fetch the weather description for a normalized city name.
    async fn fetch(&self, city: &str) -> Result<WeatherResponse, TransportError>;
}

/// Weather client configuration.
#[derive(Debug, Clone)]
pub struct WttrConfig {
    /// Base URL (default: https://wttr.in).
    pub base_url: String,
    /// User-agent string (default: mcp-weather/0.1).
    pub user_agent: String,
}

impl Default for WttrConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), user_agent: DEFAULT_USER_AGENT.to_string() }
    }
}

impl From<&AppConfig> for WttrConfig {
    fn from(config: &AppConfig) -> Self {
        Self { base_url: config.base_url.clone(), user_agent: config.user_agent.clone() }
    }
}

/// HTTP client for the wttr.in text API.
#[derive(Debug, Clone)]
pub struct WttrClient {
    http: reqwest::Client,
    base_url: Arc<Url>,
}

impl WttrClient {
    /// Create a new client with the given configuration.
    pub fn new(config: WttrConfig) -> Result<Self, Error> {
        let base_url = Url::parse(&config.base_url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(format!("cannot be a base: {}", config.base_url)));
        }

        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, base_url: Arc::new(base_url) })
    }
}

#[async_trait]
impl WeatherTransport for WttrClient {
    async fn fetch(&self, city: &str) -> Result<WeatherResponse, TransportError> {
        let start = Instant::now();
        let url = city_url(&self.base_url, city)?;

        tracing::debug!("requesting weather: {}", url);

        let response = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, "text/plain")
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() {
            return Err(TransportError::ServerError { status: status.as_u16() });
        }

        let body = response.text().await?;

        tracing::debug!("weather response {} for {} in {:?} ({} bytes)", status, city, start.elapsed(), body.len());

        Ok(WeatherResponse { status: status.as_u16(), body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> WttrClient {
        WttrClient::new(WttrConfig { base_url: server.uri(), ..Default::default() }).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = WttrConfig::default();
        assert_eq!(config.base_url, "https://wttr.in");
        assert_eq!(config.user_agent, "mcp-weather/0.1");
    }

    #[test]
    fn test_config_from_app_config() {
        let app = AppConfig { base_url: "http://localhost:9000".into(), ..Default::default() };
        let config = WttrConfig::from(&app);
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.user_agent, app.user_agent);
    }

    #[test]
    fn test_client_new_invalid_url() {
        let config = WttrConfig { base_url: "not a url".into(), ..Default::default() };
        assert!(matches!(WttrClient::new(config), Err(Error::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/paris"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Partly cloudy +18°C\n"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let response = client.fetch("paris").await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "Partly cloudy +18°C\n");
    }

    #[tokio::test]
    async fn test_fetch_client_errors_are_completed_responses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/atlantis"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Unknown location"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/busy"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(client.fetch("atlantis").await.unwrap().status, 404);
        assert_eq!(client.fetch("busy").await.unwrap().status, 429);
    }

    #[tokio::test]
    async fn test_fetch_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/paris"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = client.fetch("paris").await;
        assert!(matches!(result, Err(TransportError::ServerError { status: 503 })));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let client = WttrClient::new(WttrConfig { base_url: uri, ..Default::default() }).unwrap();
        let result = client.fetch("paris").await;
        assert!(matches!(result, Err(TransportError::Network(_))));
    }
}
