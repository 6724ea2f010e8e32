//! HTTP adapter for the `ResolutionHop` port.

mod dto;
mod http_client;

pub use http_client::ResolutionHttpClient;
