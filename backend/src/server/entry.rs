//! Entry service wiring.

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use super::ServerConfig;
use crate::Trace;
use crate::domain::RequestOrchestrator;
use crate::inbound::http::entry::forward_cep;
use crate::inbound::http::health::{HealthState, live, ready};

/// Build the entry service application.
pub fn build_entry_app(
    health_state: web::Data<HealthState>,
    orchestrator: web::Data<RequestOrchestrator>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(health_state)
        .app_data(orchestrator)
        .wrap(Trace)
        .service(ready)
        .service(live)
        .service(forward_cep)
}

/// Construct the entry service HTTP server.
///
/// # Returns
/// A [`Server`] that must be awaited to drive the listener. Readiness is left
/// for the caller to mark once the server is handed to the runtime.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_entry_server(
    health_state: web::Data<HealthState>,
    orchestrator: RequestOrchestrator,
    config: &ServerConfig,
) -> std::io::Result<Server> {
    let orchestrator = web::Data::new(orchestrator);
    let server = HttpServer::new(move || build_entry_app(health_state.clone(), orchestrator.clone()))
        .bind(config.bind_addr())?
        .run();
    Ok(server)
}
