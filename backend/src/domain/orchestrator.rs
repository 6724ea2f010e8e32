//! Entry-service role: validate, forward, transform, reply.
//!
//! The orchestrator validates the code before anything else so malformed
//! input never opens a span or reaches the network. Once validated it opens
//! the hop span, forwards the code with the span's context, recomputes the
//! derived temperature units from the returned Celsius value, and serialises
//! the reply before any status is committed.

use std::sync::Arc;

use opentelemetry::Context;
use tracing::{error, warn};

use super::ports::{HopReply, ResolutionHop, ResolutionHopError};
use super::{ChainResult, EncodedBody, FailureSignal, PostalCode, Stage, WeatherReport};
use crate::telemetry::{SpanKind, Tracer};

/// Name of the span covering one entry-service request.
pub const ENTRY_SPAN_NAME: &str = "entry.forward";

const NOT_FOUND_STATUS: u16 = 404;
const UNPROCESSABLE_STATUS: u16 = 422;

/// Drives one request through the entry-service state machine.
#[derive(Clone)]
pub struct RequestOrchestrator {
    hop: Arc<dyn ResolutionHop>,
    tracer: Tracer,
}

impl RequestOrchestrator {
    /// Create an orchestrator forwarding through `hop`.
    pub fn new(hop: Arc<dyn ResolutionHop>, tracer: Tracer) -> Self {
        Self { hop, tracer }
    }

    /// Handle one raw code received under the `inbound` trace context.
    ///
    /// # Errors
    ///
    /// Returns the [`FailureSignal`] for whichever stage failed.
    pub async fn handle(&self, raw_code: &str, inbound: &Context) -> ChainResult<EncodedBody> {
        let code = PostalCode::parse(raw_code).map_err(|reason| {
            warn!(stage = %Stage::Validate, %reason, "rejecting invalid postal code");
            FailureSignal::invalid_input(Stage::Validate, reason.to_string())
        })?;

        let mut span = self
            .tracer
            .start_span(inbound, ENTRY_SPAN_NAME, SpanKind::Server);
        span.set_attribute("postal_code", code.as_str().to_owned());
        let result = self.forward(&code, span.context()).await;
        span.record_result(result)
    }

    async fn forward(&self, code: &PostalCode, context: &Context) -> ChainResult<EncodedBody> {
        let HopReply { location, celsius } = self
            .hop
            .resolve(code, context)
            .await
            .map_err(|err| map_hop_error(code, err))?;
        WeatherReport::new(location, celsius).encode()
    }
}

fn map_hop_error(code: &PostalCode, err: ResolutionHopError) -> FailureSignal {
    match err {
        ResolutionHopError::Rejected { status, message } if status == NOT_FOUND_STATUS => {
            warn!(stage = %Stage::Forward, %code, status, "resolution service reports unknown postal code");
            FailureSignal::not_found(Stage::Forward, message)
        }
        ResolutionHopError::Rejected { status, message } if status == UNPROCESSABLE_STATUS => {
            warn!(stage = %Stage::Forward, %code, status, "resolution service rejected postal code");
            FailureSignal::invalid_input(Stage::Forward, message)
        }
        ResolutionHopError::Rejected { status, message } => {
            error!(stage = %Stage::Forward, %code, status, %message, "resolution service failed");
            FailureSignal::unavailable(
                Stage::Forward,
                format!("resolution service answered {status}: {message}"),
            )
        }
        ResolutionHopError::Transport { message } => {
            error!(stage = %Stage::Forward, %code, %message, "resolution service unreachable");
            FailureSignal::unavailable(Stage::Forward, message)
        }
        ResolutionHopError::Decode { message } => {
            error!(stage = %Stage::Transform, %code, %message, "resolution reply undecodable");
            FailureSignal::parse_failure(Stage::Transform, message)
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::time::Duration;

    use opentelemetry::trace::{Status, TraceContextExt};

    use super::*;
    use crate::domain::ports::MockResolutionHop;
    use crate::domain::{FailureKind, Location};
    use crate::telemetry::{CANCELLED, ERROR_ATTRIBUTE};
    use crate::test_support::spans::{SpanDataExt, recording_provider, remote_parent};
    use async_trait::async_trait;
    use rstest::rstest;
    use serde_json::Value;

    fn sao_paulo_reply() -> HopReply {
        HopReply {
            location: Location::new("São Paulo, SP").expect("valid location"),
            celsius: 20.0,
        }
    }

    #[tokio::test]
    async fn forwards_valid_code_and_derives_units() {
        let (provider, exporter) = recording_provider("entry-service");
        let inbound = remote_parent();
        let parent = inbound.span().span_context().clone();
        let (expected_trace, parent_span) = (parent.trace_id(), parent.span_id());
        let mut hop = MockResolutionHop::new();
        hop.expect_resolve()
            .withf(move |code, context| {
                let span = context.span();
                let forwarded = span.span_context();
                code.as_str() == "01001000"
                    && forwarded.trace_id() == expected_trace
                    && forwarded.is_valid()
                    && forwarded.span_id() != parent_span
            })
            .times(1)
            .returning(|_, _| Ok(sao_paulo_reply()));
        let orchestrator = RequestOrchestrator::new(Arc::new(hop), provider.tracer());

        let body = orchestrator
            .handle("01001000", &inbound)
            .await
            .expect("successful chain");

        let json: Value = serde_json::from_slice(body.as_bytes()).expect("json body");
        assert_eq!(json["Location"], "São Paulo, SP");
        assert_eq!(json["Temperature"]["Celsius"], 20.0);
        assert_eq!(json["Temperature"]["Fahrenheit"], 68.0);
        assert_eq!(json["Temperature"]["Kelvin"], 293.0);

        drop(orchestrator);
        provider.shutdown().expect("tracer shutdown");
        let spans = exporter.spans();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].name, ENTRY_SPAN_NAME);
        assert_eq!(spans[0].parent(), Some(parent_span));
        assert_eq!(spans[0].status, Status::Ok);
        assert_eq!(spans[0].attribute("postal_code").as_deref(), Some("01001000"));
    }

    #[rstest]
    #[case("0000000a")]
    #[case("123")]
    #[case("")]
    #[case(" 01001-000 ")]
    #[tokio::test]
    async fn invalid_code_never_reaches_the_hop(#[case] raw: &str) {
        let (provider, exporter) = recording_provider("entry-service");
        let mut hop = MockResolutionHop::new();
        hop.expect_resolve().times(0);
        let orchestrator = RequestOrchestrator::new(Arc::new(hop), provider.tracer());

        let failure = orchestrator
            .handle(raw, &remote_parent())
            .await
            .expect_err("invalid input");

        assert_eq!(failure.kind(), FailureKind::InvalidInput);
        assert_eq!(failure.stage(), Stage::Validate);
        drop(orchestrator);
        provider.shutdown().expect("tracer shutdown");
        assert!(exporter.spans().is_empty(), "invalid input opens no span");
    }

    #[rstest]
    #[case(ResolutionHopError::rejected(404_u16, "CEP not found"), FailureKind::NotFound, Stage::Forward)]
    #[case(ResolutionHopError::rejected(422_u16, "Invalid CEP"), FailureKind::InvalidInput, Stage::Forward)]
    #[case(ResolutionHopError::rejected(500_u16, "Internal Server Error"), FailureKind::Unavailable, Stage::Forward)]
    #[case(ResolutionHopError::rejected(503_u16, "busy"), FailureKind::Unavailable, Stage::Forward)]
    #[case(ResolutionHopError::transport("connection refused"), FailureKind::Unavailable, Stage::Forward)]
    #[case(ResolutionHopError::decode("expected value"), FailureKind::ParseFailure, Stage::Transform)]
    #[tokio::test]
    async fn maps_hop_failures(
        #[case] hop_error: ResolutionHopError,
        #[case] expected_kind: FailureKind,
        #[case] expected_stage: Stage,
    ) {
        let (provider, exporter) = recording_provider("entry-service");
        let mut hop = MockResolutionHop::new();
        hop.expect_resolve()
            .times(1)
            .return_once(move |_, _| Err(hop_error));
        let orchestrator = RequestOrchestrator::new(Arc::new(hop), provider.tracer());

        let failure = orchestrator
            .handle("01001000", &remote_parent())
            .await
            .expect_err("hop failure");

        assert_eq!(failure.kind(), expected_kind);
        assert_eq!(failure.stage(), expected_stage);
        drop(orchestrator);
        provider.shutdown().expect("tracer shutdown");
        let spans = exporter.spans();
        assert_eq!(spans.len(), 1, "span closed on the error path");
        assert!(spans[0].is_error());
        assert!(!spans[0].is_cancelled());
    }

    /// Hop that never answers, standing in for a client that disconnects
    /// while the resolution service is still working.
    struct StalledHop;

    #[async_trait]
    impl ResolutionHop for StalledHop {
        async fn resolve(
            &self,
            _code: &PostalCode,
            _context: &Context,
        ) -> Result<HopReply, ResolutionHopError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn abandoned_request_closes_the_span_as_cancelled() {
        let (provider, exporter) = recording_provider("entry-service");
        let orchestrator = RequestOrchestrator::new(Arc::new(StalledHop), provider.tracer());
        let inbound = remote_parent();

        let outcome = tokio::time::timeout(
            Duration::from_millis(20),
            orchestrator.handle("01001000", &inbound),
        )
        .await;

        assert!(outcome.is_err(), "the stalled hop never answers");
        drop(orchestrator);
        provider.shutdown().expect("tracer shutdown");
        let spans = exporter.spans();
        let [span] = spans.as_slice() else {
            panic!("expected exactly one span, got {spans:?}");
        };
        assert_eq!(span.name, ENTRY_SPAN_NAME);
        assert!(span.is_cancelled());
        assert_eq!(span.attribute(ERROR_ATTRIBUTE).as_deref(), Some(CANCELLED));
    }

    #[tokio::test]
    async fn unavailable_message_keeps_remote_status() {
        let (provider, _exporter) = recording_provider("entry-service");
        let mut hop = MockResolutionHop::new();
        hop.expect_resolve()
            .return_once(|_, _| Err(ResolutionHopError::rejected(502_u16, "bad gateway")));
        let orchestrator = RequestOrchestrator::new(Arc::new(hop), provider.tracer());

        let failure = orchestrator
            .handle("01001000", &remote_parent())
            .await
            .expect_err("hop failure");

        assert!(failure.message().contains("502"));
    }

    #[tokio::test]
    async fn identical_replies_encode_identically() {
        let (provider, _exporter) = recording_provider("entry-service");
        let mut hop = MockResolutionHop::new();
        hop.expect_resolve()
            .times(2)
            .returning(|_, _| Ok(sao_paulo_reply()));
        let orchestrator = RequestOrchestrator::new(Arc::new(hop), provider.tracer());

        let first = orchestrator.handle("01001000", &remote_parent()).await.expect("first");
        let second = orchestrator.handle("01001000", &remote_parent()).await.expect("second");

        assert_eq!(first, second);
    }
}
