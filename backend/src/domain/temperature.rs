//! Temperature readings and derived display units.

use serde::{Deserialize, Serialize};

/// Offset added to Celsius to obtain Kelvin.
///
/// The chain uses the simplified 273 rather than the physical 273.15; clients
/// already depend on the rounded figure.
pub const KELVIN_OFFSET: f64 = 273.0;

/// Temperature in the base unit plus the two derived units.
///
/// Serialised with the field names the services expose on the wire:
/// `{"Celsius": .., "Fahrenheit": .., "Kelvin": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Temperature {
    pub celsius: f64,
    pub fahrenheit: f64,
    pub kelvin: f64,
}

/// Derive Fahrenheit and Kelvin from Celsius.
///
/// Non-finite input passes through unchanged.
///
/// # Examples
/// ```
/// use cep_weather::domain::temperature::derive;
///
/// let reading = derive(20.0);
/// assert_eq!(reading.fahrenheit, 68.0);
/// assert_eq!(reading.kelvin, 293.0);
/// ```
#[must_use]
pub fn derive(celsius: f64) -> Temperature {
    Temperature {
        celsius,
        fahrenheit: celsius * 9.0 / 5.0 + 32.0,
        kelvin: celsius + KELVIN_OFFSET,
    }
}
