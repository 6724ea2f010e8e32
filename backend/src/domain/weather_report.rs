//! Combined location and temperature payload returned by both services.

use serde::Serialize;
use tracing::error;

use super::failure::{FailureSignal, Stage};
use super::location::Location;
use super::temperature::{Temperature, derive};

/// Location plus temperature in all display units.
///
/// Wire shape: `{"Location": "...", "Temperature": {"Celsius": .., "Fahrenheit": .., "Kelvin": ..}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WeatherReport {
    pub location: Location,
    pub temperature: Temperature,
}

impl WeatherReport {
    /// Build a report, deriving the display units from Celsius.
    #[must_use]
    pub fn new(location: Location, celsius: f64) -> Self {
        Self {
            location,
            temperature: derive(celsius),
        }
    }

    /// Serialise the report ahead of committing a response status.
    ///
    /// # Errors
    ///
    /// Returns a [`FailureSignal`] of kind `ParseFailure` when serialisation
    /// fails.
    pub fn encode(&self) -> Result<EncodedBody, FailureSignal> {
        encode_json(self)
    }
}

/// JSON response body that is known to have serialised successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody(Vec<u8>);

impl EncodedBody {
    /// Borrow the encoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Take ownership of the encoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// Serialise any payload into an [`EncodedBody`].
///
/// # Errors
///
/// Returns a `ParseFailure` signal at [`Stage::Reply`] when `serde_json`
/// rejects the value.
pub fn encode_json<T: Serialize>(value: &T) -> Result<EncodedBody, FailureSignal> {
    serde_json::to_vec(value).map(EncodedBody).map_err(|err| {
        error!(stage = %Stage::Reply, error = %err, "failed to encode reply body");
        FailureSignal::parse_failure(Stage::Reply, format!("failed to encode reply: {err}"))
    })
}
