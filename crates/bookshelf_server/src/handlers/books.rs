//! Book handlers

use super::blocking;
use crate::extractors::{JsonFields, ResourceId};
use crate::AppState;
use axum::{extract::State, response::Response};
use bookshelf_core::{BookService, Reply, Status};

pub async fn list(State(state): State<AppState>) -> Response {
    let catalog = state.catalog.clone();
    blocking(move || Reply::from_result(BookService::new(&catalog).list(), Status::Ok)).await
}

/// `GET /authors/:id/books`
pub async fn list_by_author(
    State(state): State<AppState>,
    ResourceId(author_id): ResourceId,
) -> Response {
    let catalog = state.catalog.clone();
    blocking(move || {
        Reply::from_result(BookService::new(&catalog).list_by_author(author_id), Status::Ok)
    })
    .await
}

pub async fn get(State(state): State<AppState>, ResourceId(id): ResourceId) -> Response {
    let catalog = state.catalog.clone();
    blocking(move || Reply::from_result(BookService::new(&catalog).get(id), Status::Ok)).await
}

pub async fn create(State(state): State<AppState>, JsonFields(fields): JsonFields) -> Response {
    let catalog = state.catalog.clone();
    blocking(move || Reply::from_result(BookService::new(&catalog).create(&fields), Status::Created))
        .await
}

pub async fn update(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    JsonFields(fields): JsonFields,
) -> Response {
    let catalog = state.catalog.clone();
    blocking(move || Reply::from_result(BookService::new(&catalog).update(id, &fields), Status::Ok))
        .await
}

/// Deletes the book together with its reviews.
pub async fn delete(State(state): State<AppState>, ResourceId(id): ResourceId) -> Response {
    let catalog = state.catalog.clone();
    blocking(move || Reply::from_result(BookService::new(&catalog).delete(id), Status::Ok)).await
}
