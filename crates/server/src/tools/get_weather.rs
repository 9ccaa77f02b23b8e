//! get_weather tool implementation.
//!
//! Validates the city, resolves it through the cache-fronted resolver, and
//! renders either `{city, result, source}` or `{city, error}`.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use skycast_client::{CityQuery, LookupOutcome, Resolver};
use skycast_core::Error;

/// Input parameters for the get_weather tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetWeatherParams {
    /// The city to get the weather for.
    ///
    /// At least 2 characters; letters, spaces, or hyphens only.
    pub city: String,
}

/// Output of the get_weather tool. Exactly one of `result` or `error` is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum GetWeatherOutput {
    Success {
        /// The city as requested.
        city: String,
        /// Short weather description, e.g. "Partly cloudy +18°C".
        result: String,
        /// "cache" or "network".
        source: String,
    },
    Failure {
        /// The city as requested.
        city: String,
        /// Human-readable failure message.
        error: String,
    },
}

impl GetWeatherOutput {
    pub fn from_outcome(city: &str, outcome: LookupOutcome) -> Self {
        match outcome {
            LookupOutcome::Found { value, origin } => {
                Self::Success { city: city.to_string(), result: value, source: origin.to_string() }
            }
            LookupOutcome::Failed(err) => Self::Failure { city: city.to_string(), error: err.to_string() },
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }
}

/// Implementation of the get_weather tool.
///
/// Invalid city names are rejected as invalid params before any lookup. Lookup
/// failures are not protocol errors: they come back as a tool result flagged
/// `is_error` carrying the `{city, error}` JSON.
pub async fn get_weather_impl(resolver: &Resolver, params: GetWeatherParams) -> Result<CallToolResult, McpError> {
    let query = CityQuery::parse(&params.city).map_err(|e| Error::InvalidInput(e.to_string()))?;

    let outcome = resolver.resolve(query.as_str()).await;
    let output = GetWeatherOutput::from_outcome(query.as_str(), outcome);
    let json = serde_json::to_string_pretty(&output).map_err(Error::from)?;

    if output.is_failure() {
        Ok(CallToolResult::error(vec![Content::text(json)]))
    } else {
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}
