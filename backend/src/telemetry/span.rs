//! Span handles: cloneable tracers and drop guards.
//!
//! Services receive [`Tracer`] handles and open spans with
//! [`Tracer::start_span`]; the returned [`SpanGuard`] ends the span when it is
//! dropped, whichever path the handler takes out.

use opentelemetry::trace::{SpanKind, Status, TraceContextExt, Tracer as _};
use opentelemetry::{Context, KeyValue, Value};
use opentelemetry_sdk::trace::SdkTracer;

use super::propagation::reserved_trace_id;
use crate::domain::FailureSignal;

/// Attribute recording the failure kind of an errored span.
pub const FAILURE_KIND_ATTRIBUTE: &str = "failure.kind";
/// Attribute recording the stage at which a span failed.
pub const FAILURE_STAGE_ATTRIBUTE: &str = "failure.stage";
/// Attribute flagging an errored or cancelled span.
pub const ERROR_ATTRIBUTE: &str = "error";
/// Status description and `error` value of a span closed without an outcome.
pub const CANCELLED: &str = "cancelled";

/// Cloneable handle for opening spans on behalf of one service.
#[derive(Debug, Clone)]
pub struct Tracer {
    inner: SdkTracer,
}

impl Tracer {
    pub(super) fn new(inner: SdkTracer) -> Self {
        Self { inner }
    }

    /// Open a child span of `parent`.
    ///
    /// Without a span in `parent` the new span is a root; it adopts the trace
    /// id reserved on the request context when there is one. The guard's
    /// [`SpanGuard::context`] is the context to propagate downstream.
    #[must_use = "dropping the guard closes the span immediately"]
    pub fn start_span(&self, parent: &Context, name: &'static str, kind: SpanKind) -> SpanGuard {
        let mut builder = self.inner.span_builder(name).with_kind(kind);
        if let Some(trace_id) = reserved_trace_id(parent) {
            builder = builder.with_trace_id(trace_id);
        }
        let span = self.inner.build_with_context(builder, parent);
        SpanGuard {
            context: parent.with_span(span),
            settled: false,
        }
    }
}

/// Open span. Dropping the guard ends it.
///
/// A guard dropped without [`SpanGuard::record_ok`] or a recorded failure is
/// closed with an error status of `cancelled` and `error=cancelled`.
#[derive(Debug)]
pub struct SpanGuard {
    context: Context,
    settled: bool,
}

impl SpanGuard {
    /// Context carrying this span.
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Record an attribute.
    pub fn set_attribute(&self, key: &'static str, value: impl Into<Value>) {
        self.context
            .span()
            .set_attribute(KeyValue::new(key, value.into()));
    }

    /// Mark the span successful.
    pub fn record_ok(&mut self) {
        self.context.span().set_status(Status::Ok);
        self.settled = true;
    }

    /// Mark the span failed with `failure`'s kind and stage.
    pub fn record_failure(&mut self, failure: &FailureSignal) {
        let span = self.context.span();
        span.set_attributes([
            KeyValue::new(FAILURE_KIND_ATTRIBUTE, failure.kind().as_str()),
            KeyValue::new(FAILURE_STAGE_ATTRIBUTE, failure.stage().as_str()),
            KeyValue::new(ERROR_ATTRIBUTE, failure.kind().as_str()),
        ]);
        span.set_status(Status::error(failure.message().to_owned()));
        self.settled = true;
    }

    /// Record the outcome of `result` and pass it through.
    pub fn record_result<T>(
        &mut self,
        result: Result<T, FailureSignal>,
    ) -> Result<T, FailureSignal> {
        match &result {
            Ok(_) => self.record_ok(),
            Err(failure) => self.record_failure(failure),
        }
        result
    }
}

impl Drop for SpanGuard {
    fn drop(&mut self) {
        let span = self.context.span();
        if !self.settled {
            span.set_attribute(KeyValue::new(ERROR_ATTRIBUTE, CANCELLED));
            span.set_status(Status::error(CANCELLED));
        }
        span.end();
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for span guards.

    use std::collections::HashMap;
    use std::time::Duration;

    use opentelemetry::trace::SpanId;

    use super::*;
    use crate::domain::{FailureKind, Stage};
    use crate::telemetry::{TRACEPARENT_HEADER, extract, extract_request_context};
    use crate::test_support::spans::{SpanDataExt, recording_provider};

    const TRACE: &str = "4bf92f3577b34da6a3ce929d0e0e4736";
    const PARENT: &str = "00f067aa0ba902b7";

    fn remote_parent(flags: &str) -> Context {
        let headers = HashMap::from([(
            TRACEPARENT_HEADER.to_owned(),
            format!("00-{TRACE}-{PARENT}-{flags}"),
        )]);
        extract(&headers)
    }

    #[test]
    fn child_span_links_to_remote_parent() {
        let (provider, exporter) = recording_provider("test-service");

        let mut guard = provider
            .tracer()
            .start_span(&remote_parent("01"), "resolve", SpanKind::Server);
        let child = guard.context().span().span_context().clone();
        guard.record_ok();
        drop(guard);
        provider.shutdown().expect("clean shutdown");

        let span = exporter.spans().pop().expect("one span");
        assert_eq!(span.span_context.trace_id().to_string(), TRACE);
        assert_eq!(span.parent_span_id.to_string(), PARENT);
        assert_eq!(span.span_context.span_id(), child.span_id());
        assert_eq!(span.span_kind, SpanKind::Server);
        assert_eq!(span.status, Status::Ok);
    }

    #[test]
    fn root_span_adopts_the_reserved_trace_id() {
        let (provider, exporter) = recording_provider("test-service");
        let (context, trace_id) = extract_request_context(&HashMap::<String, String>::new());

        let mut guard = provider
            .tracer()
            .start_span(&context, "entry", SpanKind::Server);
        guard.record_ok();
        drop(guard);
        provider.shutdown().expect("clean shutdown");

        let span = exporter.spans().pop().expect("one span");
        assert_eq!(span.span_context.trace_id(), trace_id);
        assert_eq!(span.parent_span_id, SpanId::INVALID);
    }

    #[tokio::test]
    async fn guard_dropped_without_outcome_is_cancelled() {
        let (provider, exporter) = recording_provider("test-service");
        let tracer = provider.tracer();

        let pending = async move {
            let _guard = tracer.start_span(&Context::new(), "hop", SpanKind::Server);
            std::future::pending::<()>().await;
        };
        let timed_out = tokio::time::timeout(Duration::from_millis(10), pending).await;
        assert!(timed_out.is_err());
        provider.shutdown().expect("clean shutdown");

        let span = exporter.spans().pop().expect("one span");
        assert!(span.is_cancelled());
        assert_eq!(span.attribute(ERROR_ATTRIBUTE).as_deref(), Some(CANCELLED));
    }

    #[test]
    fn failures_record_kind_and_stage() {
        let (provider, exporter) = recording_provider("test-service");

        let mut guard = provider
            .tracer()
            .start_span(&Context::new(), "hop", SpanKind::Server);
        let result: Result<(), _> =
            guard.record_result(Err(FailureSignal::not_found(Stage::LocationLookup, "gone")));
        assert!(result.is_err());
        drop(guard);
        provider.shutdown().expect("clean shutdown");

        let span = exporter.spans().pop().expect("one span");
        assert_eq!(span.status, Status::error("gone"));
        assert_eq!(
            span.attribute(FAILURE_KIND_ATTRIBUTE).as_deref(),
            Some(FailureKind::NotFound.as_str())
        );
        assert_eq!(
            span.attribute(FAILURE_STAGE_ATTRIBUTE).as_deref(),
            Some("location_lookup")
        );
    }

    #[test]
    fn unsampled_parent_is_not_exported() {
        let (provider, exporter) = recording_provider("test-service");

        let mut guard = provider
            .tracer()
            .start_span(&remote_parent("00"), "hop", SpanKind::Server);
        guard.record_ok();
        drop(guard);
        provider.shutdown().expect("clean shutdown");

        assert!(exporter.spans().is_empty());
    }
}
