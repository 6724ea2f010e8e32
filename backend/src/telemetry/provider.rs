//! Tracer provider lifecycle.
//!
//! `main` owns one [`TracerProvider`] per process and hands [`Tracer`] clones
//! to the services. Finished spans go through the SDK's batch span processor:
//! a bounded queue drained by a dedicated export thread. Spans arriving while
//! the queue is full are dropped, never buffered without limit. Export
//! failures during operation are reported by the SDK's internal logging and
//! otherwise swallowed; [`TracerProvider::shutdown`] is the only fatal path.

use std::time::Duration;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::error::OTelSdkError;
use opentelemetry_sdk::trace::{
    BatchConfigBuilder, BatchSpanProcessor, SdkTracerProvider, SpanExporter, SpanProcessor,
};
use url::Url;

use super::span::Tracer;

/// Batching knobs for the span processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    /// Finished spans held before new ones are dropped.
    pub max_queue_size: usize,
    /// Spans sent per export call.
    pub max_export_batch_size: usize,
    /// Interval between scheduled exports.
    pub scheduled_delay: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_queue_size: 2048,
            max_export_batch_size: 512,
            scheduled_delay: Duration::from_secs(5),
        }
    }
}

impl BatchConfig {
    fn to_sdk(self) -> opentelemetry_sdk::trace::BatchConfig {
        let max_queue_size = self.max_queue_size.max(1);
        BatchConfigBuilder::default()
            .with_max_queue_size(max_queue_size)
            .with_max_export_batch_size(self.max_export_batch_size.clamp(1, max_queue_size))
            .with_scheduled_delay(self.scheduled_delay)
            .build()
    }
}

/// Failures building or shutting down the provider.
#[derive(Debug, thiserror::Error)]
pub enum TracerError {
    /// The OTLP exporter could not be constructed.
    #[error("failed to build OTLP span exporter: {source}")]
    ExporterBuild {
        source: opentelemetry_otlp::ExporterBuildError,
    },
    /// Buffered spans could not be flushed or the exporter failed to close.
    #[error("tracer provider shutdown failed: {source}")]
    Shutdown { source: OTelSdkError },
}

/// Owner of the span pipeline for one process.
///
/// # Examples
/// ```rust,ignore
/// use std::time::Duration;
///
/// use cep_weather::telemetry::TracerProvider;
///
/// let provider = TracerProvider::otlp("entry-service", &collector_url, Duration::from_secs(10))?;
/// let tracer = provider.tracer();
/// // hand `tracer` to services, serve requests ...
/// provider.shutdown()?;
/// ```
#[derive(Debug)]
pub struct TracerProvider {
    inner: SdkTracerProvider,
    service_name: &'static str,
}

impl TracerProvider {
    /// Export spans to an OTLP/HTTP collector at `collector_url`.
    ///
    /// # Errors
    ///
    /// Returns [`TracerError::ExporterBuild`] when the exporter cannot be
    /// configured.
    pub fn otlp(
        service_name: &'static str,
        collector_url: &Url,
        export_timeout: Duration,
    ) -> Result<Self, TracerError> {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_http()
            .with_endpoint(collector_url.as_str())
            .with_timeout(export_timeout)
            .build()
            .map_err(|source| TracerError::ExporterBuild { source })?;
        Ok(Self::with_exporter(
            service_name,
            exporter,
            BatchConfig::default(),
        ))
    }

    /// Batch spans into `exporter`.
    pub fn with_exporter<E>(service_name: &'static str, exporter: E, config: BatchConfig) -> Self
    where
        E: SpanExporter + 'static,
    {
        let processor = BatchSpanProcessor::builder(exporter)
            .with_batch_config(config.to_sdk())
            .build();
        Self::with_processor(service_name, processor)
    }

    fn with_processor<P>(service_name: &'static str, processor: P) -> Self
    where
        P: SpanProcessor + 'static,
    {
        let inner = SdkTracerProvider::builder()
            .with_resource(Resource::builder().with_service_name(service_name).build())
            .with_span_processor(processor)
            .build();
        Self {
            inner,
            service_name,
        }
    }

    /// Cloneable handle for opening spans.
    #[must_use]
    pub fn tracer(&self) -> Tracer {
        Tracer::new(self.inner.tracer(self.service_name))
    }

    /// Flush buffered spans and shut the exporter down.
    ///
    /// Spans closed through surviving [`Tracer`] clones after this call are
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns [`TracerError::Shutdown`] when the pipeline does not close
    /// cleanly.
    pub fn shutdown(self) -> Result<(), TracerError> {
        self.inner
            .shutdown()
            .map_err(|source| TracerError::Shutdown { source })
    }
}
