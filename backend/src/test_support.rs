//! Test utilities for the service crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is compiled for tests and when the
//! `test-support` feature is enabled.

pub mod spans {
    //! In-memory span collection.

    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex, PoisonError};
    use std::time::Duration;

    use opentelemetry::Context;
    use opentelemetry::trace::{
        SpanContext, SpanId, Status, TraceContextExt, TraceFlags, TraceState,
    };
    use opentelemetry_sdk::error::OTelSdkResult;
    use opentelemetry_sdk::trace::{IdGenerator, RandomIdGenerator, SpanData, SpanExporter};

    use crate::telemetry::{BatchConfig, CANCELLED, TracerProvider};

    /// Exporter keeping every exported span in memory.
    ///
    /// Clones share the same storage, so a test can hand one clone to a
    /// [`TracerProvider`] and inspect another. Unlike the SDK's in-memory
    /// exporter, spans survive the provider's shutdown.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingSpanExporter {
        spans: Arc<Mutex<Vec<SpanData>>>,
        shut_down: Arc<AtomicBool>,
    }

    impl RecordingSpanExporter {
        /// Every span exported so far, in export order.
        #[must_use]
        pub fn spans(&self) -> Vec<SpanData> {
            self.spans
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Whether the provider has shut the exporter down.
        #[must_use]
        pub fn is_shut_down(&self) -> bool {
            self.shut_down.load(Ordering::SeqCst)
        }
    }

    impl SpanExporter for RecordingSpanExporter {
        async fn export(&self, batch: Vec<SpanData>) -> OTelSdkResult {
            self.spans
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend(batch);
            Ok(())
        }

        fn shutdown_with_timeout(&mut self, _timeout: Duration) -> OTelSdkResult {
            self.shut_down.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Start a provider that records into a fresh [`RecordingSpanExporter`].
    #[must_use]
    pub fn recording_provider(service_name: &'static str) -> (TracerProvider, RecordingSpanExporter) {
        let exporter = RecordingSpanExporter::default();
        let provider =
            TracerProvider::with_exporter(service_name, exporter.clone(), BatchConfig::default());
        (provider, exporter)
    }

    /// Context continuing a sampled trace started by a remote caller.
    #[must_use]
    pub fn remote_parent() -> Context {
        let ids = RandomIdGenerator::default();
        Context::new().with_remote_span_context(SpanContext::new(
            ids.new_trace_id(),
            ids.new_span_id(),
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        ))
    }

    /// Assertion helpers over exported spans.
    pub trait SpanDataExt {
        /// String form of attribute `key`, if recorded.
        fn attribute(&self, key: &str) -> Option<String>;
        /// Parent span id, or `None` for a root span.
        fn parent(&self) -> Option<SpanId>;
        /// Whether the span closed with an error status.
        fn is_error(&self) -> bool;
        /// Whether the span was closed without an outcome.
        fn is_cancelled(&self) -> bool;
    }

    impl SpanDataExt for SpanData {
        fn attribute(&self, key: &str) -> Option<String> {
            self.attributes
                .iter()
                .find(|attribute| attribute.key.as_str() == key)
                .map(|attribute| attribute.value.as_str().into_owned())
        }

        fn parent(&self) -> Option<SpanId> {
            (self.parent_span_id != SpanId::INVALID).then_some(self.parent_span_id)
        }

        fn is_error(&self) -> bool {
            matches!(self.status, Status::Error { .. })
        }

        fn is_cancelled(&self) -> bool {
            self.status == Status::error(CANCELLED)
        }
    }
}

pub mod sources {
    //! Scripted location and weather sources that count their calls.

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::domain::ports::{
        LocationSource, LocationSourceError, WeatherSource, WeatherSourceError,
    };
    use crate::domain::{Location, PostalCode};

    /// Location source answering every lookup with the same outcome.
    #[derive(Debug, Clone)]
    pub struct ScriptedLocationSource {
        outcome: Result<Location, LocationSourceError>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedLocationSource {
        /// Answer every lookup with `outcome`.
        #[must_use]
        pub fn new(outcome: Result<Location, LocationSourceError>) -> Self {
            Self {
                outcome,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Number of lookups served.
        #[must_use]
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LocationSource for ScriptedLocationSource {
        async fn resolve_location(
            &self,
            _code: &PostalCode,
        ) -> Result<Location, LocationSourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    /// Weather source answering every lookup with the same outcome.
    #[derive(Debug, Clone)]
    pub struct ScriptedWeatherSource {
        outcome: Result<f64, WeatherSourceError>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedWeatherSource {
        /// Answer every lookup with `outcome`.
        #[must_use]
        pub fn new(outcome: Result<f64, WeatherSourceError>) -> Self {
            Self {
                outcome,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Number of lookups served.
        #[must_use]
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WeatherSource for ScriptedWeatherSource {
        async fn current_celsius(&self, _location: &Location) -> Result<f64, WeatherSourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }
}
