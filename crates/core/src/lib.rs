//! Core types and shared functionality for mcp-weather.
//!
//! This crate provides:
//! - Bounded in-memory lookup cache with lazy TTL expiry
//! - Cache key normalization and an injectable clock
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;

pub use cache::{CacheEntry, MemoryCache, WeatherCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
