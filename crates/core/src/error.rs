//! Unified error types for mcp-weather.
//!
//! Lookup failures (not found, unavailable, ...) are never errors here: they are
//! returned as values by the resolver. This enum covers the protocol-level
//! failures that do surface to the MCP client.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the mcp-weather server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., a city name with digits).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Invalid URL for the upstream weather service.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// HTTP client could not be constructed.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Tool output could not be serialized.
    #[error("SERIALIZE_FAILED: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Unexpected internal failure while serving a request.
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::InvalidUrl(msg) => (-32003, msg.clone()),
            Error::HttpError(msg) => (-32008, msg.clone()),
            Error::Serialize(e) => (-32603, e.to_string()),
            Error::Internal(_) => (-32603, "Failed to process weather request".to_string()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("City name must be at least 2 characters long.".to_string());
        assert!(err.to_string().starts_with("INVALID_INPUT"));
        assert!(err.to_string().contains("2 characters"));
    }

    #[test]
    fn test_invalid_input_maps_to_invalid_params() {
        let err = Error::InvalidInput("bad city".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32602);
        assert_eq!(mcp_err.message, "bad city");
    }

    #[test]
    fn test_internal_error_hides_details() {
        let err = Error::Internal("task panicked: index out of bounds".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32603);
        assert_eq!(mcp_err.message, "Failed to process weather request");
    }
}
