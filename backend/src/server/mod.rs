//! Server construction and middleware wiring for both services.
//!
//! Each service gets an app builder, used directly by integration tests, and
//! a `create_*_server` function that binds the listener for the binaries.
//! Health probes are registered before the catch-all code route so that
//! `/health/*` is never read as a postal code.

mod config;
mod entry;
mod resolution;

pub use config::ServerConfig;
pub use entry::{build_entry_app, create_entry_server};
pub use resolution::{build_resolution_app, create_resolution_server};
