//! Core domain logic for the bookshelf catalog.
//! This crate is the single source of truth for catalog invariants.

pub mod db;
pub mod logging;
pub mod memory;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use memory::{
    MemoryError, MemoryResult, MemorySection, MemorySnapshot, MemoryStore, MetricsUpdated,
    PopularBook, SearchEntry, SearchRecorded, SiteMetrics, RECENT_SEARCH_CAPACITY,
};
pub use model::author::{Author, AuthorId, AuthorPatch, NewAuthor};
pub use model::book::{Book, BookId, BookPatch, NewBook};
pub use model::review::{NewReview, Review, ReviewId, ReviewPatch, RATING_RANGE};
pub use model::{FieldMap, ValidationError};
pub use repo::catalog_repo::{
    AuthorRepository, BookRepository, DeleteReport, EntityKind, RepoError, RepoResult,
    ReviewRepository, SqliteCatalogRepository,
};
pub use repo::unit_of_work::{AccessMode, Catalog, UnitOfWork};
pub use service::author_service::AuthorService;
pub use service::book_service::BookService;
pub use service::error::{ServiceError, ServiceResult};
pub use service::reply::{Reply, Status, StatusError};
pub use service::review_service::ReviewService;
pub use service::Deleted;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
