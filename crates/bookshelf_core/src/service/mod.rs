//! Catalog use-case services.
//!
//! # Responsibility
//! - Validate untyped input before any storage access.
//! - Run each operation in exactly one unit of work.
//! - Translate every repository failure into a classified `ServiceError`.

pub mod author_service;
pub mod book_service;
pub mod error;
pub mod reply;
pub mod review_service;

use serde::{Deserialize, Serialize};

/// Confirmation payload for successful deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    pub message: String,
}
