//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (optionally via a `.env` file) or
//! defaults.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
///
/// This struct contains all configurable aspects of the server, organized
/// by domain for clarity and maintainability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Outbound weather API configuration.
    pub weather: WeatherConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for the Open-Meteo APIs used by the weather tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Geocoding search endpoint.
    pub geocoding_url: String,

    /// Forecast endpoint.
    pub forecast_url: String,

    /// Weather model ensemble requested from the forecast API.
    pub model: String,

    /// Per-request timeout for outbound calls, in seconds.
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_url: "https://geocoding-api.open-meteo.com/v1/search".to_string(),
            forecast_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            model: "gfs_seamless".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "Authless Assistant".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            weather: WeatherConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        if let Ok(url) = std::env::var("MCP_GEOCODING_URL") {
            info!("Geocoding endpoint overridden: {}", url);
            config.weather.geocoding_url = url;
        }

        if let Ok(url) = std::env::var("MCP_FORECAST_URL") {
            info!("Forecast endpoint overridden: {}", url);
            config.weather.forecast_url = url;
        }

        if let Ok(model) = std::env::var("MCP_WEATHER_MODEL") {
            config.weather.model = model;
        }

        if let Ok(timeout) = std::env::var("MCP_WEATHER_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) if secs > 0 => config.weather.timeout_secs = secs,
                _ => warn!(
                    "Ignoring invalid MCP_WEATHER_TIMEOUT_SECS={:?}, using {}s",
                    timeout, config.weather.timeout_secs
                ),
            }
        }

        config
    }
}
