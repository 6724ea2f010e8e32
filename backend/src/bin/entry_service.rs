//! Entry service: validates codes and forwards them to the resolution service.

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use cep_weather::domain::RequestOrchestrator;
use cep_weather::inbound::http::health::HealthState;
use cep_weather::outbound::resolution_hop::ResolutionHttpClient;
use cep_weather::server::{ServerConfig, create_entry_server};
use cep_weather::settings::EntrySettings;
use cep_weather::telemetry::TracerProvider;

const SERVICE_NAME: &str = "entry-service";

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = EntrySettings::load_from_iter(std::env::args_os())
        .map_err(|error| eyre!("failed to load entry settings: {error}"))?;
    let timeout = settings.request_timeout()?;

    let provider = TracerProvider::otlp(SERVICE_NAME, &settings.collector_url()?, timeout)
        .wrap_err("failed to build span exporter")?;

    let hop = ResolutionHttpClient::new(settings.service_url()?, timeout)
        .wrap_err("failed to build resolution client")?;
    let orchestrator = RequestOrchestrator::new(Arc::new(hop), provider.tracer());

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(settings.bind_host(), settings.port);
    let server = create_entry_server(health_state.clone(), orchestrator, &config)
        .wrap_err_with(|| format!("failed to bind {}:{}", settings.bind_host(), settings.port))?;

    health_state.mark_ready();
    info!(host = settings.bind_host(), port = settings.port, "entry service listening");
    let served = server.await;
    health_state.mark_unhealthy();

    provider
        .shutdown()
        .wrap_err("failed to flush spans on shutdown")?;
    served.wrap_err("entry service stopped with an error")
}
