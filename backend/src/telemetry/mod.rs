//! Distributed tracing for the two-hop chain.
//!
//! Purpose: Carry trace context across the hop between the entry and
//! resolution services and record one span per hop. Context travels in W3C
//! `traceparent` and `baggage` headers; finished spans are batched by the
//! OpenTelemetry SDK and shipped to an OTLP/HTTP collector.

mod propagation;
mod provider;
mod span;

pub use opentelemetry::trace::SpanKind;
pub use propagation::{
    ActixHeaderExtractor, BAGGAGE_HEADER, ReqwestHeaderInjector, TRACE_ID_HEADER,
    TRACEPARENT_HEADER, extract, extract_request_context, inject,
};
pub use provider::{BatchConfig, TracerError, TracerProvider};
pub use span::{
    CANCELLED, ERROR_ATTRIBUTE, FAILURE_KIND_ATTRIBUTE, FAILURE_STAGE_ATTRIBUTE, SpanGuard, Tracer,
};
