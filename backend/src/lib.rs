//! CEP weather chain: an entry service that validates Brazilian postal codes
//! and forwards them to a resolution service, which looks up the location
//! and current temperature. Both hops are traced with W3C trace context.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;
pub mod telemetry;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use middleware::Trace;
