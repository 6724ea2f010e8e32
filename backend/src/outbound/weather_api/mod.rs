//! WeatherAPI outbound adapter.
//!
//! This module provides a thin HTTP implementation of the `WeatherSource`
//! port.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_WEATHER_API_URL, WeatherApiHttpSource};
