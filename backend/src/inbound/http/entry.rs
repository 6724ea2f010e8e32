//! Entry-service endpoint.
//!
//! ```text
//! GET /{cep}
//! ```
//!
//! The whole remaining path is taken as the code so that empty or
//! multi-segment input reaches validation and is answered with `422`.

use actix_web::{HttpResponse, get, web};
use opentelemetry::Context;

use super::json_reply;
use crate::domain::{FailureSignal, RequestOrchestrator};

/// Validate the code and forward it to the resolution service.
#[get("/{cep:.*}")]
pub async fn forward_cep(
    orchestrator: web::Data<RequestOrchestrator>,
    cep: web::Path<String>,
    context: Option<web::ReqData<Context>>,
) -> Result<HttpResponse, FailureSignal> {
    let inbound = context.map(web::ReqData::into_inner).unwrap_or_default();
    let body = orchestrator.handle(&cep.into_inner(), &inbound).await?;
    Ok(json_reply(body))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Arc;

    use super::*;
    use crate::Trace;
    use crate::domain::Location;
    use crate::domain::ports::{HopReply, MockResolutionHop, ResolutionHopError};
    use crate::test_support::spans::recording_provider;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::Value;

    async fn call(hop: MockResolutionHop, uri: &str) -> (StatusCode, Vec<u8>) {
        let (provider, _exporter) = recording_provider("entry-service");
        let orchestrator = RequestOrchestrator::new(Arc::new(hop), provider.tracer());
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .app_data(web::Data::new(orchestrator))
                .service(forward_cep),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = res.status();
        let body = test::read_body(res).await.to_vec();
        (status, body)
    }

    #[actix_web::test]
    async fn replies_with_combined_payload() {
        let mut hop = MockResolutionHop::new();
        hop.expect_resolve().times(1).returning(|_, _| {
            Ok(HopReply {
                location: Location::new("São Paulo, SP").expect("valid location"),
                celsius: 20.0,
            })
        });

        let (status, body) = call(hop, "/01001000").await;

        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["Temperature"]["Fahrenheit"], 68.0);
        assert_eq!(json["Temperature"]["Kelvin"], 293.0);
    }

    #[rstest]
    #[case("/0000000a")]
    #[case("/123")]
    #[case("/")]
    #[case("/0100/1000")]
    #[actix_web::test]
    async fn rejects_invalid_codes_without_forwarding(#[case] uri: &str) {
        let mut hop = MockResolutionHop::new();
        hop.expect_resolve().times(0);

        let (status, body) = call(hop, uri).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, b"Invalid CEP");
    }

    #[actix_web::test]
    async fn relays_not_found() {
        let mut hop = MockResolutionHop::new();
        hop.expect_resolve()
            .return_once(|_, _| Err(ResolutionHopError::rejected(404_u16, "CEP not found")));

        let (status, body) = call(hop, "/99999999").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, b"CEP not found");
    }

    #[actix_web::test]
    async fn undecodable_reply_is_a_parse_failure() {
        let mut hop = MockResolutionHop::new();
        hop.expect_resolve()
            .return_once(|_, _| Err(ResolutionHopError::decode("missing field `Location`")));

        let (status, body) = call(hop, "/01001000").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, b"Parse response from service failed");
    }
}
