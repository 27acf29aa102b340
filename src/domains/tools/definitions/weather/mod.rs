//! Weather tools backed by the Open-Meteo APIs.
//!
//! - `client`: typed HTTP client for geocoding and forecast endpoints
//! - `conditions`: WMO weather code descriptions
//! - `get_weather`: the `get-weather` tool

pub mod client;
pub mod conditions;
pub mod get_weather;

pub use client::{Coordinates, OpenMeteoClient, WeatherError};
pub use conditions::weather_condition;
pub use get_weather::{GetWeatherParams, GetWeatherTool};
