//! Outbound adapters implementing domain ports.
//!
//! Adapters are thin translators between external HTTP APIs and domain
//! types. They contain no business logic:
//!
//! - **viacep**: postal code to location lookup
//! - **weather_api**: current temperature lookup
//! - **resolution_hop**: entry to resolution service call with trace headers

pub(crate) mod http_support;
pub mod resolution_hop;
pub mod viacep;
pub mod weather_api;
