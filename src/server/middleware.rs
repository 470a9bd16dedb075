use axum::{extract::Request, middleware::Next, response::Response};
use log::{info, warn};
use std::time::Instant;
use uuid::Uuid;

/// Logs one line per request with a generated request id.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    info!("[{request_id}] {method} {path}");
    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis();
    if status.is_server_error() || status.is_client_error() {
        warn!("[{request_id}] {method} {path} -> {status} in {elapsed_ms}ms");
    } else {
        info!("[{request_id}] {method} {path} -> {status} in {elapsed_ms}ms");
    }

    response
}
