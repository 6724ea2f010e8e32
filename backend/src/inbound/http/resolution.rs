//! Resolution-service endpoint.
//!
//! ```text
//! GET /{cep}
//! ```

use actix_web::{HttpResponse, get, web};
use opentelemetry::Context;

use super::json_reply;
use crate::domain::{FailureSignal, ResolutionService};

/// Resolve the code to a location and its current temperature.
#[get("/{cep:.*}")]
pub async fn resolve_cep(
    service: web::Data<ResolutionService>,
    cep: web::Path<String>,
    context: Option<web::ReqData<Context>>,
) -> Result<HttpResponse, FailureSignal> {
    let inbound = context.map(web::ReqData::into_inner).unwrap_or_default();
    let body = service.handle(&cep.into_inner(), &inbound).await?;
    Ok(json_reply(body))
}
