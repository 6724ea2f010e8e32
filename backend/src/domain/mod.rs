//! Domain primitives and services.
//!
//! Purpose: Define the strongly typed values flowing through the two-hop
//! chain and the services that drive each hop. Adapters convert transport
//! payloads into these types at the boundary; nothing in this module knows
//! about HTTP.
//!
//! Public surface:
//! - PostalCode: validated 8-digit code.
//! - Location: non-empty place description.
//! - Temperature: Celsius plus derived Fahrenheit and Kelvin.
//! - FailureSignal: caller-visible failure with kind and stage.
//! - RequestOrchestrator: entry-service role.
//! - ResolutionService: resolution-service role.

pub mod failure;
pub mod location;
pub mod orchestrator;
pub mod ports;
pub mod postal_code;
pub mod resolution;
pub mod temperature;
pub mod weather_report;

pub use self::failure::{FailureKind, FailureSignal, Stage};
pub use self::location::{Location, LocationValidationError};
pub use self::orchestrator::RequestOrchestrator;
pub use self::postal_code::{POSTAL_CODE_DIGITS, PostalCode, PostalCodeError, validate};
pub use self::resolution::ResolutionService;
pub use self::temperature::{KELVIN_OFFSET, Temperature, derive};
pub use self::weather_report::{EncodedBody, WeatherReport, encode_json};

/// Result alias for domain operations that fail with a [`FailureSignal`].
pub type ChainResult<T> = Result<T, FailureSignal>;
