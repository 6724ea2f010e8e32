//! Reqwest-backed ViaCEP location source.
//!
//! This adapter owns transport details only: URL construction, timeout and
//! HTTP error mapping, and JSON decoding into a domain [`Location`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::ViaCepResponseDto;
use crate::domain::ports::{LocationSource, LocationSourceError};
use crate::domain::{Location, PostalCode};
use crate::outbound::http_support::{bounded_client, join_segments, status_message};

/// Public ViaCEP endpoint.
pub const DEFAULT_VIACEP_URL: &str = "https://viacep.com.br";

/// Location source querying `GET {base}/ws/{cep}/json/`.
pub struct ViaCepHttpSource {
    client: Client,
    base_url: Url,
}

impl ViaCepHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: bounded_client(timeout)?,
            base_url,
        })
    }

    fn lookup_url(&self, code: &PostalCode) -> Result<Url, LocationSourceError> {
        join_segments(&self.base_url, ["ws", code.as_str(), "json", ""]).ok_or_else(|| {
            LocationSourceError::transport(format!(
                "ViaCEP base URL {} cannot carry a path",
                self.base_url
            ))
        })
    }
}

#[async_trait]
impl LocationSource for ViaCepHttpSource {
    async fn resolve_location(&self, code: &PostalCode) -> Result<Location, LocationSourceError> {
        let response = self
            .client
            .get(self.lookup_url(code)?)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| LocationSourceError::transport(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| LocationSourceError::transport(error.to_string()))?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_location(body.as_ref())
    }
}

fn parse_location(body: &[u8]) -> Result<Location, LocationSourceError> {
    let decoded: ViaCepResponseDto = serde_json::from_slice(body).map_err(|error| {
        LocationSourceError::decode(format!("invalid ViaCEP JSON payload: {error}"))
    })?;
    if decoded.is_unknown_code() {
        return Err(LocationSourceError::not_found("ViaCEP reports `erro` for this code"));
    }
    decoded.into_location().map_err(LocationSourceError::decode)
}

fn map_status_error(status: StatusCode, body: &[u8]) -> LocationSourceError {
    let message = status_message(status, body);
    match status {
        StatusCode::BAD_REQUEST => LocationSourceError::invalid_code(message),
        StatusCode::NOT_FOUND => LocationSourceError::not_found(message),
        _ => LocationSourceError::transport(message),
    }
}
