//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-weather server.

pub mod get_weather;

pub use get_weather::{GetWeatherOutput, GetWeatherParams, get_weather_impl};
