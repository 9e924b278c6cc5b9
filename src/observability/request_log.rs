//! Colored per-request console log.
//!
//! Development-style access log: status (colored by class), latency,
//! method and path on one line. Rides the router as an axum middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Local;

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Logs one line per handled request.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let color = if status.is_server_error() {
        RED
    } else if status.is_client_error() {
        YELLOW
    } else {
        GREEN
    };

    println!(
        "{} |{} {} {}| {:>8.1?} | {}{:<6}{} {}",
        Local::now().format("%Y/%m/%d - %H:%M:%S"),
        color,
        status.as_u16(),
        RESET,
        start.elapsed(),
        CYAN,
        method,
        RESET,
        path,
    );

    response
}
