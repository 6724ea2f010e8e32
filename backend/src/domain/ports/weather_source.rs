//! Driven port for reading the current temperature at a location.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::Location;

define_port_error! {
    /// Errors surfaced while reading the weather.
    pub enum WeatherSourceError {
        /// Network transport failed or the service answered with a failure status.
        Transport { message: String } =>
            "weather lookup transport failed: {message}",
        /// The weather response could not be decoded.
        Decode { message: String } =>
            "weather response decode failed: {message}",
    }
}

/// Port for reading the current temperature in Celsius.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Current temperature at `location`, in degrees Celsius.
    async fn current_celsius(&self, location: &Location) -> Result<f64, WeatherSourceError>;
}

/// Fixture temperature used when wiring services without network access.
pub const FIXTURE_CELSIUS: f64 = 20.0;

/// Fixture implementation reporting [`FIXTURE_CELSIUS`] everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureWeatherSource;

#[async_trait]
impl WeatherSource for FixtureWeatherSource {
    async fn current_celsius(&self, _location: &Location) -> Result<f64, WeatherSourceError> {
        Ok(FIXTURE_CELSIUS)
    }
}
