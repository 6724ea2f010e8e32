//! Tracing middleware attaching the propagated trace context per request.
//!
//! Each incoming request has its W3C `traceparent` and `baggage` headers
//! extracted into an [`opentelemetry::Context`], stored in the request
//! extensions for the handler. A request without a valid `traceparent`
//! starts a fresh trace whose id is reserved on the context. Every response
//! carries a `trace-id` header with the hex trace identifier, success or
//! error.

use std::task::{Context, Poll};

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{Error, HttpMessage};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::error;

use crate::telemetry::{self, ActixHeaderExtractor, TRACE_ID_HEADER};

/// Tracing middleware extracting the inbound trace context and adding a
/// `trace-id` header to every response.
///
/// Handlers read the context with `web::ReqData<opentelemetry::Context>`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use cep_weather::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service wrapper produced by [`Trace`].
///
/// Applications should not use this type directly.
pub struct TraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let (context, trace_id) =
            telemetry::extract_request_context(&ActixHeaderExtractor(req.headers()));
        req.extensions_mut().insert::<opentelemetry::Context>(context);
        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            match HeaderValue::from_str(&trace_id.to_string()) {
                Ok(value) => {
                    res.response_mut()
                        .headers_mut()
                        .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                }
                Err(error) => {
                    error!(
                        %error,
                        %trace_id,
                        "failed to encode trace identifier header"
                    );
                }
            }
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{BAGGAGE_HEADER, TRACEPARENT_HEADER};
    use actix_web::{App, HttpResponse, test, web};
    use opentelemetry::baggage::BaggageExt;
    use opentelemetry::trace::TraceContextExt;

    const TRACE: &str = "4bf92f3577b34da6a3ce929d0e0e4736";
    const SPAN: &str = "00f067aa0ba902b7";

    async fn echo_context(context: web::ReqData<opentelemetry::Context>) -> HttpResponse {
        let span = context.span();
        let parent = span.span_context();
        let parent_span = if parent.is_valid() {
            parent.span_id().to_string()
        } else {
            String::new()
        };
        HttpResponse::Ok().body(format!(
            "{}|{}",
            parent_span,
            context
                .baggage()
                .get("tenant")
                .map(|value| value.as_str())
                .unwrap_or_default()
        ))
    }

    async fn call_echo(req: test::TestRequest) -> (String, String) {
        let app =
            test::init_service(App::new().wrap(Trace).route("/", web::get().to(echo_context)))
                .await;
        let res = test::call_service(&app, req.uri("/").to_request()).await;
        let trace_id = res
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("header is ascii")
            .to_owned();
        let body = test::read_body(res).await;
        let body = std::str::from_utf8(&body).expect("utf8 body").to_owned();
        (trace_id, body)
    }

    #[actix_web::test]
    async fn adopts_inbound_traceparent_and_baggage() {
        let req = test::TestRequest::get()
            .insert_header((TRACEPARENT_HEADER, format!("00-{TRACE}-{SPAN}-01")))
            .insert_header((BAGGAGE_HEADER, "tenant=acme"));

        let (trace_id, body) = call_echo(req).await;

        assert_eq!(trace_id, TRACE);
        assert_eq!(body, format!("{SPAN}|acme"));
    }

    #[actix_web::test]
    async fn starts_fresh_trace_without_traceparent() {
        let req = test::TestRequest::get().insert_header((BAGGAGE_HEADER, "tenant=acme"));

        let (trace_id, body) = call_echo(req).await;

        assert_eq!(trace_id.len(), 32);
        assert_ne!(trace_id, "0".repeat(32));
        assert_eq!(body, "|acme");
    }

    #[actix_web::test]
    async fn invalid_traceparent_starts_fresh_trace() {
        let req = test::TestRequest::get().insert_header((TRACEPARENT_HEADER, "garbage"));

        let (trace_id, body) = call_echo(req).await;

        assert_ne!(trace_id, TRACE);
        assert_eq!(body, "|");
    }

    #[actix_web::test]
    async fn adds_trace_id_header_to_errors() {
        let app = test::init_service(App::new().wrap(Trace).route(
            "/",
            web::get().to(|| async { HttpResponse::NotFound().body("CEP not found") }),
        ))
        .await;
        let req = test::TestRequest::get().uri("/").to_request();
        let res = test::call_service(&app, req).await;
        assert!(res.headers().contains_key(TRACE_ID_HEADER));
    }
}
