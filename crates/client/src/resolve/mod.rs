//! Resilient weather lookup.
//!
//! [`Resolver::resolve`] answers from the cache while an entry is fresh and
//! otherwise fetches from the weather service under a [`RetryPolicy`]:
//!
//! - up to 3 attempts, each bounded by a 5s timeout
//! - 200ms then 400ms backoff between retryable failures
//! - 404, empty bodies, and other client errors stop immediately
//! - only a verified network result is written back to the cache
//!
//! Every failure comes back as [`LookupOutcome::Failed`]; nothing here returns
//! `Err` or panics on a bad upstream.

pub mod policy;

pub use policy::{AttemptClass, Classification, Event, RetryPolicy, State, classify_response};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use skycast_core::cache::{CacheEntry, WeatherCache, cache_ttl, normalize_city};
use skycast_core::{Clock, SystemClock};

use crate::wttr::{TransportError, WeatherTransport};

/// Where a successful value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Cache,
    Network,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Cache => "cache",
            Origin::Network => "network",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the service is considered unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableCause {
    /// The last attempt ran out of time.
    Timeout,
    /// Rate limiting, server failure, or the network.
    Server,
}

impl fmt::Display for UnavailableCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableCause::Timeout => f.write_str("Request timed out."),
            UnavailableCause::Server => f.write_str("The weather service is currently unavailable."),
        }
    }
}

/// Failure without the city attached; what the state machine works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    EmptyResult,
    TerminalClientError(u16),
    Unavailable(UnavailableCause),
}

impl FailureKind {
    pub fn into_error(self, city: &str) -> LookupError {
        let city = city.to_string();
        match self {
            FailureKind::NotFound => LookupError::NotFound { city },
            FailureKind::EmptyResult => LookupError::EmptyResult { city },
            FailureKind::TerminalClientError(status) => LookupError::TerminalClientError { city, status },
            FailureKind::Unavailable(cause) => LookupError::Unavailable { city, cause },
        }
    }
}

/// A failed lookup, rendered as the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The service has no record of the city (404).
    #[error("No weather data found for {city}. Please check the spelling or try a major city")]
    NotFound { city: String },

    /// The service answered without usable data.
    #[error("No weather data available for {city}")]
    EmptyResult { city: String },

    /// A 4xx other than 404/429; not retried.
    #[error("Unable to fetch weather for \"{city}\". {} Please try again later.", UnavailableCause::Server)]
    TerminalClientError { city: String, status: u16 },

    /// Retries exhausted, or a non-retryable server/network failure.
    #[error("Unable to fetch weather for \"{city}\". {cause} Please try again later.")]
    Unavailable { city: String, cause: UnavailableCause },
}

impl LookupError {
    pub fn city(&self) -> &str {
        match self {
            LookupError::NotFound { city }
            | LookupError::EmptyResult { city }
            | LookupError::TerminalClientError { city, .. }
            | LookupError::Unavailable { city, .. } => city,
        }
    }
}

/// Result of [`Resolver::resolve`]: exactly one of a value or an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found { value: String, origin: Origin },
    Failed(LookupError),
}

impl LookupOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, LookupOutcome::Found { .. })
    }

    pub fn origin(&self) -> Option<Origin> {
        match self {
            LookupOutcome::Found { origin, .. } => Some(*origin),
            LookupOutcome::Failed(_) => None,
        }
    }
}

/// One network attempt, as recorded in the attempt log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryAttempt {
    /// 1-based attempt number.
    pub attempt: u32,
    /// Backoff waited before this attempt (zero for the first).
    pub delay_before: Duration,
    pub class: AttemptClass,
}

/// Cache-fronted weather resolver.
///
/// Safe to share across tasks; the cache is the only shared mutable state.
pub struct Resolver {
    transport: Arc<dyn WeatherTransport>,
    cache: Arc<dyn WeatherCache>,
    clock: Arc<dyn Clock>,
    policy: RetryPolicy,
    ttl: chrono::Duration,
}

impl Resolver {
    /// Create a resolver on the system clock with the standard retry policy.
    pub fn new(transport: Arc<dyn WeatherTransport>, cache: Arc<dyn WeatherCache>) -> Self {
        Self { transport, cache, clock: Arc::new(SystemClock), policy: RetryPolicy::default(), ttl: cache_ttl() }
    }

    /// Replace the clock used for freshness checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn cache(&self) -> &Arc<dyn WeatherCache> {
        &self.cache
    }

    /// Look up the weather for a validated city name.
    pub async fn resolve(&self, city: &str) -> LookupOutcome {
        self.resolve_traced(city).await.0
    }

    /// Like [`resolve`](Self::resolve), also returning the attempt log.
    ///
    /// The log is empty on a cache hit.
    pub async fn resolve_traced(&self, city: &str) -> (LookupOutcome, Vec<RetryAttempt>) {
        let key = normalize_city(city);
        let mut attempts = Vec::new();
        let mut waited = Duration::ZERO;
        let mut state = State::ProbingCache;

        loop {
            state = match state {
                State::ProbingCache => {
                    let event = match self.cache.get_fresh(&key, self.clock.now()) {
                        Some(entry) => {
                            tracing::debug!(key = %key, "weather cache hit");
                            Event::CacheHit(entry.value)
                        }
                        None => {
                            tracing::debug!(key = %key, "weather cache miss");
                            Event::CacheMiss
                        }
                    };
                    self.policy.transition(State::ProbingCache, event)
                }
                State::Attempting(n) => {
                    let classification = self.attempt(&key).await;
                    tracing::debug!(key = %key, attempt = n, result = ?classification, "weather attempt finished");
                    attempts.push(RetryAttempt { attempt: n, delay_before: waited, class: classification.class() });
                    waited = Duration::ZERO;
                    self.policy.transition(State::Attempting(n), Event::Attempted(classification))
                }
                State::Backoff { next, delay } => {
                    tracing::warn!(key = %key, next_attempt = next, delay = ?delay, "retrying weather lookup");
                    tokio::time::sleep(delay).await;
                    waited = delay;
                    self.policy.transition(State::Backoff { next, delay }, Event::BackoffElapsed)
                }
                State::Success { value, origin } => {
                    if origin == Origin::Network {
                        self.cache.put(CacheEntry::new(key.as_str(), value.as_str(), self.clock.now(), self.ttl));
                    }
                    return (LookupOutcome::Found { value, origin }, attempts);
                }
                State::Failed(kind) => {
                    let error = kind.into_error(city);
                    tracing::warn!(key = %key, attempts = attempts.len(), "weather lookup failed: {}", error);
                    return (LookupOutcome::Failed(error), attempts);
                }
            };
        }
    }

    /// One bounded request. Timing out drops the in-flight request.
    async fn attempt(&self, key: &str) -> Classification {
        match tokio::time::timeout(self.policy.attempt_timeout, self.transport.fetch(key)).await {
            Err(_) => Classification::Transient(UnavailableCause::Timeout),
            Ok(Ok(response)) => classify_response(response.status, &response.body),
            Ok(Err(TransportError::Timeout)) => Classification::Transient(UnavailableCause::Timeout),
            Ok(Err(TransportError::ServerError { status })) => classify_response(status, ""),
            Ok(Err(e)) => {
                tracing::debug!(key = %key, "weather transport error: {}", e);
                Classification::Terminal(FailureKind::Unavailable(UnavailableCause::Server))
            }
        }
    }
}
