//! HTTP handlers

pub mod authors;
pub mod books;
pub mod memory;
pub mod reviews;

use crate::extractors::ApiError;
use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use bookshelf_core::Reply;
use chrono::{SecondsFormat, Utc};
use log::{error, info, warn};
use serde_json::json;
use std::time::Instant;

pub async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "name": "Bookshelf catalog API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": "/api"
    }))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::not_found()
}

/// Logs one line per request with its status and latency.
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(req).await;
    let status = response.status();
    let elapsed_ms = started_at.elapsed().as_millis();
    if status.is_server_error() {
        warn!(
            "event=http_request module=server status=error method={method} path={path} code={} elapsed_ms={elapsed_ms}",
            status.as_u16()
        );
    } else {
        info!(
            "event=http_request module=server status=ok method={method} path={path} code={} elapsed_ms={elapsed_ms}",
            status.as_u16()
        );
    }
    response
}

/// Maps a service reply onto a JSON response.
pub(crate) fn respond(reply: Reply) -> Response {
    let status =
        StatusCode::from_u16(reply.status.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(reply.body)).into_response()
}

/// Runs a catalog operation off the async executor.
pub(crate) async fn blocking<F>(op: F) -> Response
where
    F: FnOnce() -> Reply + Send + 'static,
{
    match tokio::task::spawn_blocking(op).await {
        Ok(reply) => respond(reply),
        Err(err) => {
            error!("event=catalog_task module=server status=error error={err}");
            ApiError::internal().into_response()
        }
    }
}
