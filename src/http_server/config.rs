//! HTTP server configuration.

/// Listener configuration for the combined HTTP/WebSocket server.
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    /// Address the server binds, e.g. `0.0.0.0:8080`
    pub bind_addr: String,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}
