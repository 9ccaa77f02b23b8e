//! City query validation and request URL construction.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::TransportError;

/// Minimum city name length, in characters.
pub const MIN_CITY_LEN: usize = 2;

/// Compact wttr.in format: condition and temperature.
pub const COMPACT_FORMAT_QUERY: &str = "format=%C+%t";

static CITY_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s-]+$").expect("city charset regex is valid"));

/// Rejections for a city name that does not satisfy the input contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CityError {
    #[error("City name must be at least 2 characters long.")]
    TooShort,

    #[error("City name must contain only letters, spaces, or hyphens.")]
    InvalidCharacters,
}

/// A city name that passed validation.
///
/// Keeps the caller's original spelling; normalization for cache keys and
/// outbound requests happens in the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery(String);

impl CityQuery {
    /// Validate a raw city name.
    ///
    /// Requires at least two characters drawn only from ASCII letters,
    /// whitespace, and hyphens. A whitespace-only name counts as too short,
    /// since it would normalize to an empty path and ask for the caller's
    /// geolocated weather instead.
    pub fn parse(raw: &str) -> Result<Self, CityError> {
        if raw.chars().count() < MIN_CITY_LEN || raw.trim().is_empty() {
            return Err(CityError::TooShort);
        }

        if !CITY_CHARSET.is_match(raw) {
            return Err(CityError::InvalidCharacters);
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

}

/// Build the lookup URL for an already-normalized city.
///
/// The city becomes a single percent-encoded path segment under `base`.
pub fn city_url(base: &Url, city: &str) -> Result<Url, TransportError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| TransportError::InvalidUrl(format!("cannot be a base: {base}")))?
        .pop_if_empty()
        .push(city);
    url.set_query(Some(COMPACT_FORMAT_QUERY));
    Ok(url)
}
