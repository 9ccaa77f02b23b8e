//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::get_weather::{GetWeatherParams, get_weather_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use skycast_client::{Resolver, WttrClient, WttrConfig};
use skycast_core::{AppConfig, Error, MemoryCache};

const INSTRUCTIONS: &str = "Use get_weather to look up the current conditions and temperature for a city. \
     Results are cached for 15 minutes; failures come back as a short message to relay to the user.";

/// The main MCP server handler for mcp-weather.
#[derive(Clone)]
pub struct McpWeatherServer {
    tool_router: ToolRouter<Self>,
    resolver: Arc<Resolver>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl McpWeatherServer {
    /// Create a new server handler around an existing resolver.
    pub fn new(resolver: Arc<Resolver>) -> Self {
        Self { tool_router: Self::tool_router(), resolver }
    }

    /// Wire the wttr.in client and an in-memory cache from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let client = WttrClient::new(WttrConfig::from(config))?;
        let cache = MemoryCache::new(config.cache_max_entries);
        let resolver = Resolver::new(Arc::new(client), Arc::new(cache));
        Ok(Self::new(Arc::new(resolver)))
    }

    /// Get the current weather for a city.
    ///
    /// Runs on its own task so a panic inside a lookup becomes an internal
    /// error for this call instead of taking the session down.
    #[tool(description = "Get the current weather conditions and temperature for a specific city")]
    async fn get_weather(&self, params: Parameters<GetWeatherParams>) -> Result<CallToolResult, McpError> {
        let resolver = self.resolver.clone();
        tokio::spawn(async move { get_weather_impl(&resolver, params.0).await })
            .await
            .map_err(|e| {
                tracing::error!("get_weather task failed: {}", e);
                Error::Internal(e.to_string())
            })?
    }
}

impl ServerHandler for McpWeatherServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-weather".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(INSTRUCTIONS.into()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
