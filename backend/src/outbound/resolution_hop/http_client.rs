//! Reqwest-backed client for the entry-to-resolution hop.
//!
//! Sends `GET {base}/{cep}` with the caller's trace context injected as W3C
//! headers. A non-success reply is reported with its status so the entry
//! service can relay the resolution service's verdict.

use std::time::Duration;

use async_trait::async_trait;
use opentelemetry::Context;
use reqwest::header::HeaderMap;
use reqwest::{Client, Url};

use super::dto::ResolutionReplyDto;
use crate::domain::ports::{HopReply, ResolutionHop, ResolutionHopError};
use crate::domain::PostalCode;
use crate::outbound::http_support::{body_preview, bounded_client, join_segments};
use crate::telemetry::{self, ReqwestHeaderInjector};

/// Resolution hop over HTTP.
pub struct ResolutionHttpClient {
    client: Client,
    base_url: Url,
}

impl ResolutionHttpClient {
    /// Build a client using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: bounded_client(timeout)?,
            base_url,
        })
    }

    fn resolve_url(&self, code: &PostalCode) -> Result<Url, ResolutionHopError> {
        join_segments(&self.base_url, [code.as_str()]).ok_or_else(|| {
            ResolutionHopError::transport(format!(
                "resolution base URL {} cannot carry a path",
                self.base_url
            ))
        })
    }
}

#[async_trait]
impl ResolutionHop for ResolutionHttpClient {
    async fn resolve(
        &self,
        code: &PostalCode,
        context: &Context,
    ) -> Result<HopReply, ResolutionHopError> {
        let mut headers = HeaderMap::new();
        telemetry::inject(context, &mut ReqwestHeaderInjector(&mut headers));

        let response = self
            .client
            .get(self.resolve_url(code)?)
            .headers(headers)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| ResolutionHopError::transport(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| ResolutionHopError::transport(error.to_string()))?;
        if !status.is_success() {
            return Err(ResolutionHopError::rejected(
                status.as_u16(),
                body_preview(body.as_ref()),
            ));
        }
        parse_reply(body.as_ref())
    }
}

fn parse_reply(body: &[u8]) -> Result<HopReply, ResolutionHopError> {
    let decoded: ResolutionReplyDto = serde_json::from_slice(body).map_err(|error| {
        ResolutionHopError::decode(format!("invalid resolution reply: {error}"))
    })?;
    decoded.into_hop_reply().map_err(ResolutionHopError::decode)
}
