//! HTTP and WebSocket transports.
//!
//! Both transports are thin adapters over [`crate::api::Api`]: they
//! decode the request envelope, call the facade and marshal the reply.
//! The WebSocket endpoint shares the HTTP server's listener.

pub mod config;
pub mod routes;
pub mod server;
pub mod ws_routes;

pub use config::HttpServerConfig;
pub use server::HttpServer;
