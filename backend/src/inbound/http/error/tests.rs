//! Tests for HTTP failure mapping.

use super::*;
use crate::domain::Stage;
use actix_web::body::to_bytes;
use actix_web::http::header;
use rstest::rstest;

#[rstest]
#[case(FailureKind::InvalidInput, StatusCode::UNPROCESSABLE_ENTITY, "Invalid CEP")]
#[case(FailureKind::NotFound, StatusCode::NOT_FOUND, "CEP not found")]
#[case(FailureKind::Unavailable, StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")]
#[case(
    FailureKind::ParseFailure,
    StatusCode::INTERNAL_SERVER_ERROR,
    "Parse response from service failed"
)]
fn mapping_is_total(
    #[case] kind: FailureKind,
    #[case] status: StatusCode,
    #[case] body: &str,
) {
    let failure = FailureSignal::new(kind, Stage::Forward, "detail");
    assert_eq!(to_response(&failure), (status, body));
    assert_eq!(ResponseError::status_code(&failure), status);
}

#[rstest]
#[case(Stage::Validate)]
#[case(Stage::LocationLookup)]
#[case(Stage::Reply)]
fn stage_does_not_change_the_response(#[case] stage: Stage) {
    let failure = FailureSignal::not_found(stage, "gone");
    assert_eq!(to_response(&failure), (StatusCode::NOT_FOUND, CEP_NOT_FOUND_BODY));
}

#[actix_web::test]
async fn error_response_is_plain_text_without_internal_detail() {
    let failure = FailureSignal::unavailable(Stage::Forward, "connection refused to 10.0.0.7");

    let response = ResponseError::error_response(&failure);

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .expect("content type set")
        .to_str()
        .expect("ascii content type");
    assert!(content_type.starts_with("text/plain"));
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    assert_eq!(bytes.as_ref(), INTERNAL_ERROR_BODY.as_bytes());
}
