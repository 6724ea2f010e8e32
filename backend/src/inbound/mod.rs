//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! HTTP handlers for both the entry and resolution services live under
//! [`http`].

pub mod http;
