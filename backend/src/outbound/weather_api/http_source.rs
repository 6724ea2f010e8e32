//! Reqwest-backed WeatherAPI temperature source.
//!
//! Queries `GET {base}/v1/current.json?key={key}&q={city}&aqi=no` and reads
//! `current.temp_c`. Only the city part of the location is sent, which
//! WeatherAPI resolves more reliably than the full `"City, UF"` text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::dto::CurrentWeatherDto;
use crate::domain::Location;
use crate::domain::ports::{WeatherSource, WeatherSourceError};
use crate::outbound::http_support::{bounded_client, join_segments, status_message};

/// Public WeatherAPI endpoint.
pub const DEFAULT_WEATHER_API_URL: &str = "https://api.weatherapi.com";

/// Weather source backed by WeatherAPI.
pub struct WeatherApiHttpSource {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl WeatherApiHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: bounded_client(timeout)?,
            base_url,
            api_key: api_key.into(),
        })
    }

    fn current_url(&self, location: &Location) -> Result<Url, WeatherSourceError> {
        let mut url = join_segments(&self.base_url, ["v1", "current.json"]).ok_or_else(|| {
            WeatherSourceError::transport(format!(
                "WeatherAPI base URL {} cannot carry a path",
                self.base_url
            ))
        })?;
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("q", location.city())
            .append_pair("aqi", "no");
        Ok(url)
    }
}

#[async_trait]
impl WeatherSource for WeatherApiHttpSource {
    async fn current_celsius(&self, location: &Location) -> Result<f64, WeatherSourceError> {
        let response = self
            .client
            .get(self.current_url(location)?)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| WeatherSourceError::transport(redact(error)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| WeatherSourceError::transport(redact(error)))?;
        if !status.is_success() {
            return Err(WeatherSourceError::transport(status_message(
                status,
                body.as_ref(),
            )));
        }
        parse_celsius(body.as_ref())
    }
}

/// Describe a reqwest error without echoing the request URL, which carries
/// the API key.
fn redact(error: reqwest::Error) -> String {
    error.without_url().to_string()
}

fn parse_celsius(body: &[u8]) -> Result<f64, WeatherSourceError> {
    let decoded: CurrentWeatherDto = serde_json::from_slice(body).map_err(|error| {
        WeatherSourceError::decode(format!("invalid WeatherAPI JSON payload: {error}"))
    })?;
    Ok(decoded.current.temp_c)
}
