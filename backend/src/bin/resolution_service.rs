//! Resolution service: resolves a code to a location and its current
//! temperature.

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use cep_weather::domain::ResolutionService;
use cep_weather::inbound::http::health::HealthState;
use cep_weather::outbound::viacep::ViaCepHttpSource;
use cep_weather::outbound::weather_api::WeatherApiHttpSource;
use cep_weather::server::{ServerConfig, create_resolution_server};
use cep_weather::settings::ResolutionSettings;
use cep_weather::telemetry::TracerProvider;

const SERVICE_NAME: &str = "resolution-service";

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

    let settings = ResolutionSettings::load_from_iter(std::env::args_os())
        .map_err(|error| eyre!("failed to load resolution settings: {error}"))?;
    let timeout = settings.request_timeout()?;

    let provider = TracerProvider::otlp(SERVICE_NAME, &settings.collector_url()?, timeout)
        .wrap_err("failed to build span exporter")?;

    let locations = ViaCepHttpSource::new(settings.viacep_url()?, timeout)
        .wrap_err("failed to build ViaCEP client")?;
    let weather = WeatherApiHttpSource::new(
        settings.weather_api_url()?,
        settings.weather_api_key.clone(),
        timeout,
    )
    .wrap_err("failed to build WeatherAPI client")?;
    let service = ResolutionService::new(Arc::new(locations), Arc::new(weather), provider.tracer());

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(settings.bind_host(), settings.port);
    let server = create_resolution_server(health_state.clone(), service, &config)
        .wrap_err_with(|| format!("failed to bind {}:{}", settings.bind_host(), settings.port))?;

    health_state.mark_ready();
    info!(
        host = settings.bind_host(),
        port = settings.port,
        "resolution service listening"
    );
    let served = server.await;
    health_state.mark_unhealthy();

    provider
        .shutdown()
        .wrap_err("failed to flush spans on shutdown")?;
    served.wrap_err("resolution service stopped with an error")
}
