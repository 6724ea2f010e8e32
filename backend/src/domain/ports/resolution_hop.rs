//! Driven port for the network hop from the entry service to the resolution
//! service.
//!
//! Implementations must carry `context` across the process boundary so the
//! resolution service can parent its span on the caller's.

use async_trait::async_trait;
use opentelemetry::Context;

use super::define_port_error;
use crate::domain::{Location, PostalCode};

/// Fields of the resolution service reply the entry service relies on.
///
/// Only the base unit is read; derived units are recomputed locally.
#[derive(Debug, Clone, PartialEq)]
pub struct HopReply {
    /// Resolved location text.
    pub location: Location,
    /// Temperature in degrees Celsius.
    pub celsius: f64,
}

define_port_error! {
    /// Errors surfaced while calling the resolution service.
    pub enum ResolutionHopError {
        /// The request could not be sent or the reply could not be read.
        Transport { message: String } =>
            "resolution hop transport failed: {message}",
        /// The resolution service answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "resolution hop answered {status}: {message}",
        /// The reply body could not be decoded.
        Decode { message: String } =>
            "resolution hop reply decode failed: {message}",
    }
}

/// Port for forwarding one lookup to the resolution service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResolutionHop: Send + Sync {
    /// Forward `code`, propagating `context` with the request.
    async fn resolve(
        &self,
        code: &PostalCode,
        context: &Context,
    ) -> Result<HopReply, ResolutionHopError>;
}
