//! HTTP server configuration object.

/// Listening address for one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub(crate) bind_host: String,
    pub(crate) port: u16,
}

impl ServerConfig {
    /// Construct a configuration binding `bind_host:port`.
    #[must_use]
    pub fn new(bind_host: impl Into<String>, port: u16) -> Self {
        Self {
            bind_host: bind_host.into(),
            port,
        }
    }

    /// Return the address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> (&str, u16) {
        (self.bind_host.as_str(), self.port)
    }
}
