//! Retry policy as an explicit state machine.
//!
//! A lookup moves through
//! `ProbingCache -> Attempting(n) -> Backoff(n+1) -> Attempting(n+1) -> ...`
//! and ends in `Success` or `Failed`. Transitions and response classification
//! are pure; the resolver drives them and performs the side effects (cache
//! reads and writes, sleeping, network calls).

use std::time::Duration;

use super::{FailureKind, Origin, UnavailableCause};

/// Maximum attempts per lookup.
pub const MAX_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff.
pub const BACKOFF_BASE: Duration = Duration::from_millis(200);

/// Budget for a single attempt.
pub const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);

/// Statuses worth retrying: rate limiting and transient server failures.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Case-insensitive body marker the service uses when it has no data.
pub const NO_DATA_SENTINEL: &str = "unknown";

/// Lookup state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    ProbingCache,
    /// Issuing attempt `n` (1-based).
    Attempting(u32),
    /// Waiting `delay` before attempt `next`.
    Backoff { next: u32, delay: Duration },
    Success { value: String, origin: Origin },
    Failed(FailureKind),
}

impl State {
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Success { .. } | State::Failed(_))
    }
}

/// Inputs that move the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    CacheHit(String),
    CacheMiss,
    Attempted(Classification),
    BackoffElapsed,
}

/// What a single attempt amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Usable value (already trimmed).
    Success(String),
    /// Retryable if attempts remain.
    Transient(UnavailableCause),
    /// Stop now.
    Terminal(FailureKind),
}

/// Coarse attempt result recorded in the attempt log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptClass {
    Success,
    TransientFailure,
    TerminalFailure,
}

impl Classification {
    pub fn class(&self) -> AttemptClass {
        match self {
            Classification::Success(_) => AttemptClass::Success,
            Classification::Transient(_) => AttemptClass::TransientFailure,
            Classification::Terminal(_) => AttemptClass::TerminalFailure,
        }
    }
}

/// Classify a completed response.
///
/// 404 is terminal, 429 and the retryable 5xx set are transient, other 4xx and
/// 5xx are terminal. Anything else carries a body that must be non-empty and
/// free of the no-data sentinel.
pub fn classify_response(status: u16, body: &str) -> Classification {
    match status {
        404 => Classification::Terminal(FailureKind::NotFound),
        s if RETRYABLE_STATUSES.contains(&s) => Classification::Transient(UnavailableCause::Server),
        400..=499 => Classification::Terminal(FailureKind::TerminalClientError(status)),
        500.. => Classification::Terminal(FailureKind::Unavailable(UnavailableCause::Server)),
        _ => {
            let value = body.trim();
            if value.is_empty() || value.to_lowercase().contains(NO_DATA_SENTINEL) {
                Classification::Terminal(FailureKind::EmptyResult)
            } else {
                Classification::Success(value.to_string())
            }
        }
    }
}

/// Retry configuration and transition rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_base: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: MAX_ATTEMPTS, backoff_base: BACKOFF_BASE, attempt_timeout: ATTEMPT_TIMEOUT }
    }
}

impl RetryPolicy {
    /// Delay after the `retry`-th failed attempt: `base * 2^(retry - 1)`.
    ///
    /// Retry 0 (before the first attempt) waits nothing.
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }

        let factor = 2u32.saturating_pow(retry - 1);
        self.backoff_base.saturating_mul(factor)
    }

    /// Apply `event` to `state`.
    ///
    /// Events that do not apply to the current state leave it unchanged.
    pub fn transition(&self, state: State, event: Event) -> State {
        match (state, event) {
            (State::ProbingCache, Event::CacheHit(value)) => State::Success { value, origin: Origin::Cache },
            (State::ProbingCache, Event::CacheMiss) => State::Attempting(1),

            (State::Attempting(_), Event::Attempted(Classification::Success(value))) => {
                State::Success { value, origin: Origin::Network }
            }
            (State::Attempting(_), Event::Attempted(Classification::Terminal(kind))) => State::Failed(kind),
            (State::Attempting(n), Event::Attempted(Classification::Transient(cause))) => {
                if n < self.max_attempts {
                    State::Backoff { next: n + 1, delay: self.backoff(n) }
                } else {
                    State::Failed(FailureKind::Unavailable(cause))
                }
            }

            (State::Backoff { next, .. }, Event::BackoffElapsed) => State::Attempting(next),

            (state, _) => state,
        }
    }
}
