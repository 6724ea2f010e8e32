//! Resolution-service role: code to location to temperature.

use std::sync::Arc;

use opentelemetry::Context;
use tracing::{error, warn};

use super::ports::{LocationSource, LocationSourceError, WeatherSource, WeatherSourceError};
use super::{ChainResult, EncodedBody, FailureSignal, Location, PostalCode, Stage, WeatherReport};
use crate::telemetry::{SpanKind, Tracer};

/// Name of the span covering one resolution-service request.
pub const RESOLUTION_SPAN_NAME: &str = "resolution.resolve";

/// Resolves one code through the location and weather sources.
///
/// Each source is called at most once per request. A location failure
/// short-circuits the chain so the weather source is never consulted.
#[derive(Clone)]
pub struct ResolutionService {
    locations: Arc<dyn LocationSource>,
    weather: Arc<dyn WeatherSource>,
    tracer: Tracer,
}

impl ResolutionService {
    /// Create a service backed by the supplied sources.
    pub fn new(
        locations: Arc<dyn LocationSource>,
        weather: Arc<dyn WeatherSource>,
        tracer: Tracer,
    ) -> Self {
        Self {
            locations,
            weather,
            tracer,
        }
    }

    /// Handle one raw code received under the propagated `inbound` context.
    ///
    /// The span is opened before validation, so even rejected codes are
    /// recorded as a child of the caller's span.
    ///
    /// # Errors
    ///
    /// Returns the [`FailureSignal`] for whichever stage failed.
    pub async fn handle(&self, raw_code: &str, inbound: &Context) -> ChainResult<EncodedBody> {
        let mut span = self
            .tracer
            .start_span(inbound, RESOLUTION_SPAN_NAME, SpanKind::Server);
        let result = match self.resolve(raw_code).await {
            Ok(report) => {
                span.set_attribute("location", report.location.as_str().to_owned());
                report.encode()
            }
            Err(failure) => Err(failure),
        };
        span.record_result(result)
    }

    async fn resolve(&self, raw_code: &str) -> ChainResult<WeatherReport> {
        let code = PostalCode::parse(raw_code).map_err(|reason| {
            warn!(stage = %Stage::Validate, %reason, "rejecting invalid postal code");
            FailureSignal::invalid_input(Stage::Validate, reason.to_string())
        })?;
        let location = self
            .locations
            .resolve_location(&code)
            .await
            .map_err(|err| map_location_error(&code, err))?;
        let celsius = self
            .weather
            .current_celsius(&location)
            .await
            .map_err(|err| map_weather_error(&location, err))?;
        Ok(WeatherReport::new(location, celsius))
    }
}

fn map_location_error(code: &PostalCode, err: LocationSourceError) -> FailureSignal {
    let stage = Stage::LocationLookup;
    match err {
        LocationSourceError::NotFound { message } => {
            warn!(%stage, %code, %message, "postal code not found");
            FailureSignal::not_found(stage, message)
        }
        LocationSourceError::InvalidCode { message } => {
            warn!(%stage, %code, %message, "postal code rejected by lookup service");
            FailureSignal::invalid_input(stage, message)
        }
        LocationSourceError::Transport { message } => {
            error!(%stage, %code, %message, "location lookup unavailable");
            FailureSignal::unavailable(stage, message)
        }
        LocationSourceError::Decode { message } => {
            error!(%stage, %code, %message, "location response undecodable");
            FailureSignal::parse_failure(stage, message)
        }
    }
}

fn map_weather_error(location: &Location, err: WeatherSourceError) -> FailureSignal {
    let stage = Stage::WeatherLookup;
    match err {
        WeatherSourceError::Transport { message } => {
            error!(%stage, %location, %message, "weather lookup unavailable");
            FailureSignal::unavailable(stage, message)
        }
        WeatherSourceError::Decode { message } => {
            error!(%stage, %location, %message, "weather response undecodable");
            FailureSignal::parse_failure(stage, message)
        }
    }
}
