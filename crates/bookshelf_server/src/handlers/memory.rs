//! Memory store handlers
//!
//! The store is lock-guarded in memory, so these run inline on the executor.

use super::respond;
use crate::extractors::JsonFields;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::Uri,
    response::Response,
};
use bookshelf_core::{Reply, Status};
use serde_json::Value;

pub async fn get_all(State(state): State<AppState>) -> Response {
    respond(Reply::from_result(state.memory.get_all(), Status::Ok))
}

pub async fn get(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    section(&state, &key)
}

/// `GET /memory/search` and `GET /memory/metrics`: the last segment is
/// looked up as a section name like any other key.
pub async fn get_by_segment(State(state): State<AppState>, uri: Uri) -> Response {
    let key = uri.path().rsplit('/').next().unwrap_or_default();
    section(&state, key)
}

fn section(state: &AppState, key: &str) -> Response {
    respond(Reply::from_result(state.memory.get(key), Status::Ok))
}

/// Records `{"query": ...}`; a missing or non-string query is recorded as
/// the empty string.
pub async fn add_search(State(state): State<AppState>, JsonFields(fields): JsonFields) -> Response {
    let query = match fields.get("query") {
        Some(Value::String(query)) => query.clone(),
        _ => String::new(),
    };
    respond(Reply::from_result(state.memory.add_search(query), Status::Ok))
}

pub async fn update_metrics(
    State(state): State<AppState>,
    JsonFields(fields): JsonFields,
) -> Response {
    respond(Reply::from_result(state.memory.update_metrics(&fields), Status::Ok))
}
