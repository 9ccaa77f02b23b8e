//! Client code for mcp-weather.
//!
//! This crate provides the outbound weather transport, city validation, and
//! the resilient resolver (cache probe, retry policy, backoff, timeouts)
//! used by the server.

pub mod resolve;
pub mod wttr;

pub use resolve::{
    AttemptClass, Classification, FailureKind, LookupError, LookupOutcome, Origin, Resolver, RetryAttempt,
    RetryPolicy, State, UnavailableCause,
};
pub use wttr::{CityError, CityQuery, TransportError, WeatherResponse, WeatherTransport, WttrClient, WttrConfig};
