//! The combined HTTP/WebSocket server.

use std::io;
use std::sync::Arc;

use axum::middleware;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use super::config::HttpServerConfig;
use super::{routes, ws_routes};
use crate::api::Api;
use crate::observability::logger::{Logger, Severity};
use crate::observability::request_log;

/// Serves the REST routes and the `/ws` endpoint on one listener.
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Assembles the router around a shared facade.
    pub fn new(api: Arc<Api>, config: HttpServerConfig) -> Self {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let router = Router::new()
            .merge(routes::routes(api.clone()))
            .merge(ws_routes::routes(api))
            .layer(middleware::from_fn(request_log::log_requests))
            .layer(cors);

        Self { config, router }
    }

    /// The assembled router (for in-process testing).
    pub fn router(self) -> Router {
        self.router
    }

    /// Binds the listener and serves until the process stops.
    pub async fn start(self) -> io::Result<()> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;

        Logger::log(
            Severity::Info,
            "listening",
            &[("addr", &self.config.bind_addr)],
        );

        axum::serve(listener, self.router).await
    }
}
