//! HTTP adapter mapping for chain failures.
//!
//! Purpose: keep [`FailureSignal`] HTTP-agnostic while giving every failing
//! handler the same status and plain-text body. The table is total: each
//! failure kind maps to exactly one response.

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError};

use crate::domain::{FailureKind, FailureSignal};

/// Body sent for [`FailureKind::InvalidInput`].
pub const INVALID_CEP_BODY: &str = "Invalid CEP";
/// Body sent for [`FailureKind::NotFound`].
pub const CEP_NOT_FOUND_BODY: &str = "CEP not found";
/// Body sent for [`FailureKind::Unavailable`].
pub const INTERNAL_ERROR_BODY: &str = "Internal Server Error";
/// Body sent for [`FailureKind::ParseFailure`].
pub const PARSE_FAILURE_BODY: &str = "Parse response from service failed";

/// Map a failure to the status and body the caller sees.
///
/// # Examples
/// ```
/// use actix_web::http::StatusCode;
/// use cep_weather::domain::{FailureSignal, Stage};
/// use cep_weather::inbound::http::error::to_response;
///
/// let failure = FailureSignal::invalid_input(Stage::Validate, "too short");
/// assert_eq!(to_response(&failure), (StatusCode::UNPROCESSABLE_ENTITY, "Invalid CEP"));
/// ```
#[must_use]
pub fn to_response(failure: &FailureSignal) -> (StatusCode, &'static str) {
    match failure.kind() {
        FailureKind::InvalidInput => (StatusCode::UNPROCESSABLE_ENTITY, INVALID_CEP_BODY),
        FailureKind::NotFound => (StatusCode::NOT_FOUND, CEP_NOT_FOUND_BODY),
        FailureKind::Unavailable => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY),
        FailureKind::ParseFailure => (StatusCode::INTERNAL_SERVER_ERROR, PARSE_FAILURE_BODY),
    }
}

impl ResponseError for FailureSignal {
    fn status_code(&self) -> StatusCode {
        to_response(self).0
    }

    fn error_response(&self) -> HttpResponse {
        let (status, body) = to_response(self);
        HttpResponse::build(status)
            .content_type(ContentType::plaintext())
            .body(body)
    }
}

#[cfg(test)]
mod tests;
