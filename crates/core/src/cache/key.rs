//! Cache key derivation.

/// Normalize a city name into its cache key.
///
/// Trims surrounding whitespace and lowercases. The result is also the value
/// sent to the upstream weather service.
pub fn normalize_city(city: &str) -> String {
    city.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_stability() {
        assert_eq!(normalize_city("Paris"), normalize_city("Paris"));
    }

    #[test]
    fn test_normalize_case_and_whitespace() {
        assert_eq!(normalize_city("  PARIS "), "paris");
        assert_eq!(normalize_city("paris"), "paris");
        assert_eq!(normalize_city("\tNew York\n"), "new york");
    }

    #[test]
    fn test_normalize_keeps_inner_separators() {
        assert_eq!(normalize_city("Saint-Étienne"), "saint-étienne");
        assert_eq!(normalize_city("Rio  de Janeiro"), "rio  de janeiro");
    }
}
