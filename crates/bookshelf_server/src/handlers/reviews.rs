//! Review handlers

use super::blocking;
use crate::extractors::{JsonFields, ResourceId};
use crate::AppState;
use axum::{extract::State, response::Response};
use bookshelf_core::{Reply, ReviewService, Status};

pub async fn list(State(state): State<AppState>) -> Response {
    let catalog = state.catalog.clone();
    blocking(move || Reply::from_result(ReviewService::new(&catalog).list(), Status::Ok)).await
}

/// `GET /books/:id/reviews`
pub async fn list_for_book(
    State(state): State<AppState>,
    ResourceId(book_id): ResourceId,
) -> Response {
    let catalog = state.catalog.clone();
    blocking(move || {
        Reply::from_result(ReviewService::new(&catalog).list_for_book(book_id), Status::Ok)
    })
    .await
}

pub async fn get(State(state): State<AppState>, ResourceId(id): ResourceId) -> Response {
    let catalog = state.catalog.clone();
    blocking(move || Reply::from_result(ReviewService::new(&catalog).get(id), Status::Ok)).await
}

pub async fn create(State(state): State<AppState>, JsonFields(fields): JsonFields) -> Response {
    let catalog = state.catalog.clone();
    blocking(move || {
        Reply::from_result(ReviewService::new(&catalog).create(&fields), Status::Created)
    })
    .await
}

pub async fn update(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    JsonFields(fields): JsonFields,
) -> Response {
    let catalog = state.catalog.clone();
    blocking(move || {
        Reply::from_result(ReviewService::new(&catalog).update(id, &fields), Status::Ok)
    })
    .await
}

pub async fn delete(State(state): State<AppState>, ResourceId(id): ResourceId) -> Response {
    let catalog = state.catalog.clone();
    blocking(move || Reply::from_result(ReviewService::new(&catalog).delete(id), Status::Ok)).await
}
