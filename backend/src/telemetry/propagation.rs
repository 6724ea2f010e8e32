//! W3C Trace Context and Baggage propagation over HTTP headers.
//!
//! A [`TextMapCompositePropagator`] combining the SDK's trace-context and
//! baggage propagators reads and writes the `traceparent` and `baggage`
//! headers. Actix-web and reqwest header maps are adapted to the
//! [`Extractor`] and [`Injector`] carriers through thin wrappers.

use opentelemetry::propagation::{
    Extractor, Injector, TextMapCompositePropagator, TextMapPropagator,
};
use opentelemetry::trace::{TraceContextExt, TraceId};
use opentelemetry::Context;
use opentelemetry_sdk::propagation::{BaggagePropagator, TraceContextPropagator};
use opentelemetry_sdk::trace::{IdGenerator, RandomIdGenerator};
use tracing::warn;

/// Header carrying the trace id, parent span id and flags.
pub const TRACEPARENT_HEADER: &str = "traceparent";
/// Header carrying propagated key/value baggage.
pub const BAGGAGE_HEADER: &str = "baggage";
/// Response header echoing the request's trace id in lowercase hex.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Trace id reserved for a request that arrived without a usable parent.
///
/// The first span opened under the request context adopts it, so the id sent
/// back in the `trace-id` header names the trace the spans were recorded in.
#[derive(Debug, Clone, Copy)]
struct ReservedTraceId(TraceId);

fn propagator() -> TextMapCompositePropagator {
    TextMapCompositePropagator::new(vec![
        Box::new(TraceContextPropagator::new()),
        Box::new(BaggagePropagator::new()),
    ])
}

/// Read the propagated trace context and baggage from `carrier`.
///
/// Missing or malformed `traceparent` leaves the context without a remote
/// span; baggage is honoured either way.
pub fn extract(carrier: &dyn Extractor) -> Context {
    propagator().extract(carrier)
}

/// Write `context`'s span and baggage onto `carrier`.
pub fn inject(context: &Context, carrier: &mut dyn Injector) {
    propagator().inject_context(context, carrier);
}

/// Extract the request context and settle the trace id it will be reported
/// under.
///
/// With a valid inbound parent the parent's trace id is used. Otherwise a
/// fresh id is generated and reserved on the returned context for the root
/// span.
pub fn extract_request_context(carrier: &dyn Extractor) -> (Context, TraceId) {
    let context = extract(carrier);
    let parent = context.span().span_context().clone();
    if parent.is_valid() {
        return (context, parent.trace_id());
    }
    let trace_id = RandomIdGenerator::default().new_trace_id();
    (context.with_value(ReservedTraceId(trace_id)), trace_id)
}

/// Trace id reserved by [`extract_request_context`], if any.
pub(crate) fn reserved_trace_id(context: &Context) -> Option<TraceId> {
    context.get::<ReservedTraceId>().map(|reserved| reserved.0)
}

/// Inbound carrier over an actix-web header map.
#[derive(Debug, Clone, Copy)]
pub struct ActixHeaderExtractor<'a>(pub &'a actix_web::http::header::HeaderMap);

impl Extractor for ActixHeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(actix_web::http::header::HeaderName::as_str).collect()
    }

    fn get_all(&self, key: &str) -> Option<Vec<&str>> {
        let values: Vec<&str> = self
            .0
            .get_all(key)
            .filter_map(|value| value.to_str().ok())
            .collect();
        (!values.is_empty()).then_some(values)
    }
}

/// Outbound carrier over a reqwest header map.
#[derive(Debug)]
pub struct ReqwestHeaderInjector<'a>(pub &'a mut reqwest::header::HeaderMap);

impl Injector for ReqwestHeaderInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        use reqwest::header::{HeaderName, HeaderValue};

        let name = match HeaderName::from_bytes(key.as_bytes()) {
            Ok(name) => name,
            Err(error) => {
                warn!(%error, header = key, "dropping propagation header with invalid name");
                return;
            }
        };
        match HeaderValue::try_from(value) {
            Ok(value) => {
                self.0.insert(name, value);
            }
            Err(error) => {
                warn!(%error, header = key, "dropping propagation header with invalid value");
            }
        }
    }
}
