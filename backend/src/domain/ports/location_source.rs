//! Driven port for resolving a postal code to a location.
//!
//! The domain owns the request and failure contract so the resolution service
//! can stay adapter-agnostic.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Location, PostalCode};

define_port_error! {
    /// Errors surfaced while looking up a postal code.
    pub enum LocationSourceError {
        /// The lookup service reports the code does not exist.
        NotFound { message: String } =>
            "postal code not found: {message}",
        /// The lookup service rejected the code format.
        InvalidCode { message: String } =>
            "postal code rejected: {message}",
        /// Network transport failed or the service answered with a failure status.
        Transport { message: String } =>
            "location lookup transport failed: {message}",
        /// The lookup response could not be decoded.
        Decode { message: String } =>
            "location response decode failed: {message}",
    }
}

/// Port for resolving a postal code to a location.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Resolve one postal code.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use cep_weather::domain::PostalCode;
    /// use cep_weather::domain::ports::{FixtureLocationSource, LocationSource};
    ///
    /// let code = PostalCode::parse("01001000")?;
    /// let location = FixtureLocationSource.resolve_location(&code).await?;
    /// assert_eq!(location.city(), "São Paulo");
    /// ```
    async fn resolve_location(&self, code: &PostalCode) -> Result<Location, LocationSourceError>;
}

/// Fixture location used when wiring services without network access.
pub const FIXTURE_LOCATION: &str = "São Paulo, SP";

/// Fixture implementation resolving every code to [`FIXTURE_LOCATION`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureLocationSource;

#[async_trait]
impl LocationSource for FixtureLocationSource {
    async fn resolve_location(&self, _code: &PostalCode) -> Result<Location, LocationSourceError> {
        Location::new(FIXTURE_LOCATION).map_err(|err| LocationSourceError::decode(err.to_string()))
    }
}
