//! HTTP inbound adapter exposing both service endpoints.

pub mod entry;
pub mod error;
pub mod health;
pub mod resolution;

use actix_web::HttpResponse;
use actix_web::http::header::ContentType;

use crate::domain::EncodedBody;

/// Commit a `200` carrying an already serialised JSON body.
pub(crate) fn json_reply(body: EncodedBody) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(body.into_bytes())
}
