//! Resolution service wiring.

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use super::ServerConfig;
use crate::Trace;
use crate::domain::ResolutionService;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::resolution::resolve_cep;

/// Build the resolution service application.
pub fn build_resolution_app(
    health_state: web::Data<HealthState>,
    service: web::Data<ResolutionService>,
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
        .app_data(service)
        .wrap(Trace)
        .service(ready)
        .service(live)
        .service(resolve_cep)
}

/// Construct the resolution service HTTP server.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_resolution_server(
    health_state: web::Data<HealthState>,
    service: ResolutionService,
    config: &ServerConfig,
) -> std::io::Result<Server> {
    let service = web::Data::new(service);
    let server =
        HttpServer::new(move || build_resolution_app(health_state.clone(), service.clone()))
            .bind(config.bind_addr())?
            .run();
    Ok(server)
}
