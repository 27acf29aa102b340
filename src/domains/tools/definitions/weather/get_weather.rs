//! Current weather tool definition.
//!
//! Resolves a city name through the geocoding API, then fetches the forecast
//! for the first match and returns it as pretty-printed JSON.

use futures::FutureExt;
use rmcp::model::{CallToolResult, Content};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{error, info, instrument, warn};

use super::client::{OpenMeteoClient, WeatherError};
use super::conditions::weather_condition;
use crate::domains::tools::registry::{ToolContext, ToolDefinition, ToolFuture};

/// Parameters for the weather tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetWeatherParams {
    #[schemars(description = "Name of the city to get weather information for")]
    pub city: String,
}

/// Weather tool - current conditions for a named city via Open-Meteo.
pub struct GetWeatherTool;

impl GetWeatherTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get-weather";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Tool to get current weather information for a given city";

    /// Text returned when the city cannot be resolved to coordinates.
    pub fn not_found_message(city: &str) -> String {
        format!(
            "Could not find coordinates for the city: {}. Please try another city.",
            city
        )
    }

    /// Execute the tool logic.
    ///
    /// Geocoding always completes before the forecast request is issued.
    #[instrument(skip_all, fields(city = %params.city))]
    pub async fn execute(params: &GetWeatherParams, client: &OpenMeteoClient) -> CallToolResult {
        info!("Weather tool called for city: {}", params.city);

        let geocoding = match client.geocode(&params.city).await {
            Ok(response) => response,
            Err(e) => return upstream_error(e),
        };

        let Some(coordinates) = geocoding.first_coordinates() else {
            warn!("No coordinates found for city: {}", params.city);
            return CallToolResult::success(vec![Content::text(Self::not_found_message(
                &params.city,
            ))]);
        };

        let forecast = match client.forecast(coordinates).await {
            Ok(forecast) => forecast,
            Err(e) => return upstream_error(e),
        };

        let condition = forecast
            .parsed
            .current
            .weather_code()
            .map_or("Unknown", weather_condition);
        info!(
            "Current condition at ({}, {}): {}",
            coordinates.latitude, coordinates.longitude, condition
        );

        match serde_json::to_string_pretty(&forecast.raw) {
            Ok(text) => CallToolResult::success(vec![Content::text(text)]),
            Err(e) => {
                error!("Failed to serialize forecast: {}", e);
                CallToolResult::error(vec![Content::text(format!(
                    "Failed to serialize forecast: {}",
                    e
                ))])
            }
        }
    }

    /// Registry entry for this tool.
    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(Self::NAME, Self::handle)
            .with_description(Self::DESCRIPTION)
    }

    fn handle(params: GetWeatherParams, context: ToolContext) -> ToolFuture {
        async move { Ok(Self::execute(&params, &context.weather).await) }.boxed()
    }
}

fn upstream_error(err: WeatherError) -> CallToolResult {
    error!("Weather lookup failed: {}", err);
    CallToolResult::error(vec![Content::text(format!(
        "Failed to fetch weather data: {}",
        err
    ))])
}
