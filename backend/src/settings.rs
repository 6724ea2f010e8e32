//! Service settings loaded via OrthoConfig.
//!
//! Each binary loads its settings once at startup from command-line flags
//! and prefixed environment variables (`ENTRY_*`, `RESOLUTION_*`). Missing
//! required values and malformed URLs abort startup.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::viacep::DEFAULT_VIACEP_URL;
use crate::outbound::weather_api::DEFAULT_WEATHER_API_URL;

const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A configured URL could not be parsed.
    #[error("setting `{field}` is not a valid URL: {source}")]
    InvalidUrl {
        /// Name of the offending setting.
        field: &'static str,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
    /// The request timeout must be positive.
    #[error("setting `request_timeout_secs` must be greater than zero")]
    ZeroTimeout,
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, SettingsError> {
    Url::parse(raw).map_err(|source| SettingsError::InvalidUrl { field, source })
}

fn timeout_from(secs: Option<u64>) -> Result<Duration, SettingsError> {
    match secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS) {
        0 => Err(SettingsError::ZeroTimeout),
        secs => Ok(Duration::from_secs(secs)),
    }
}

/// Settings for the entry service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ENTRY")]
pub struct EntrySettings {
    /// Listening port.
    pub port: u16,
    /// Base URL of the resolution service.
    pub service_url: String,
    /// OTLP/HTTP trace collector endpoint, e.g. `http://collector:4318/v1/traces`.
    pub collector_url: String,
    /// Listening interface; defaults to all interfaces.
    pub bind_host: Option<String>,
    /// Outbound request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
}

impl EntrySettings {
    /// Return the interface to bind, falling back to the default.
    #[must_use]
    pub fn bind_host(&self) -> &str {
        self.bind_host.as_deref().unwrap_or(DEFAULT_BIND_HOST)
    }

    /// Parse the resolution service base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when the value is malformed.
    pub fn service_url(&self) -> Result<Url, SettingsError> {
        parse_url("service_url", &self.service_url)
    }

    /// Parse the span collector endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when the value is malformed.
    pub fn collector_url(&self) -> Result<Url, SettingsError> {
        parse_url("collector_url", &self.collector_url)
    }

    /// Return the outbound request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroTimeout`] when configured as zero.
    pub fn request_timeout(&self) -> Result<Duration, SettingsError> {
        timeout_from(self.request_timeout_secs)
    }
}

/// Settings for the resolution service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RESOLUTION")]
pub struct ResolutionSettings {
    /// Listening port.
    pub port: u16,
    /// WeatherAPI key. Never logged.
    pub weather_api_key: String,
    /// OTLP/HTTP trace collector endpoint, e.g. `http://collector:4318/v1/traces`.
    pub collector_url: String,
    /// Listening interface; defaults to all interfaces.
    pub bind_host: Option<String>,
    /// Outbound request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// ViaCEP base URL override.
    pub viacep_url: Option<String>,
    /// WeatherAPI base URL override.
    pub weather_api_url: Option<String>,
}

impl ResolutionSettings {
    /// Return the interface to bind, falling back to the default.
    #[must_use]
    pub fn bind_host(&self) -> &str {
        self.bind_host.as_deref().unwrap_or(DEFAULT_BIND_HOST)
    }

    /// Parse the span collector endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when the value is malformed.
    pub fn collector_url(&self) -> Result<Url, SettingsError> {
        parse_url("collector_url", &self.collector_url)
    }

    /// Parse the ViaCEP base URL, falling back to the public endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when the value is malformed.
    pub fn viacep_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "viacep_url",
            self.viacep_url.as_deref().unwrap_or(DEFAULT_VIACEP_URL),
        )
    }

    /// Parse the WeatherAPI base URL, falling back to the public endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when the value is malformed.
    pub fn weather_api_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "weather_api_url",
            self.weather_api_url
                .as_deref()
                .unwrap_or(DEFAULT_WEATHER_API_URL),
        )
    }

    /// Return the outbound request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroTimeout`] when configured as zero.
    pub fn request_timeout(&self) -> Result<Duration, SettingsError> {
        timeout_from(self.request_timeout_secs)
    }
}
