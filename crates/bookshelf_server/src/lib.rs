//! HTTP surface for the bookshelf catalog.
//!
//! Handlers translate requests into `bookshelf_core` service calls and map
//! each [`bookshelf_core::Reply`] onto a JSON response.

pub mod config;
pub mod extractors;
pub mod handlers;

use axum::{
    middleware,
    routing::get,
    Router,
};
use bookshelf_core::{Catalog, MemoryStore};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub memory: Arc<MemoryStore>,
}

impl AppState {
    pub fn new(catalog: Catalog, memory: MemoryStore) -> Self {
        Self {
            catalog: Arc::new(catalog),
            memory: Arc::new(memory),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .nest("/api", api_routes())
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(handlers::log_request))
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/authors",
            get(handlers::authors::list).post(handlers::authors::create),
        )
        .route(
            "/authors/:id",
            get(handlers::authors::get)
                .put(handlers::authors::update)
                .delete(handlers::authors::delete),
        )
        .route("/authors/:id/books", get(handlers::books::list_by_author))
        .route(
            "/books",
            get(handlers::books::list).post(handlers::books::create),
        )
        .route(
            "/books/:id",
            get(handlers::books::get)
                .put(handlers::books::update)
                .delete(handlers::books::delete),
        )
        .route("/books/:id/reviews", get(handlers::reviews::list_for_book))
        .route(
            "/reviews",
            get(handlers::reviews::list).post(handlers::reviews::create),
        )
        .route(
            "/reviews/:id",
            get(handlers::reviews::get)
                .put(handlers::reviews::update)
                .delete(handlers::reviews::delete),
        )
        .route("/memory", get(handlers::memory::get_all))
        .route(
            "/memory/search",
            get(handlers::memory::get_by_segment).post(handlers::memory::add_search),
        )
        .route(
            "/memory/metrics",
            get(handlers::memory::get_by_segment).put(handlers::memory::update_metrics),
        )
        .route("/memory/:key", get(handlers::memory::get))
}
