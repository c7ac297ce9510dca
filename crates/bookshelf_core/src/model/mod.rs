//! Catalog domain model.
//!
//! # Responsibility
//! - Define the `Author`/`Book`/`Review` records and their record projection.
//! - Define create drafts and partial-update patches parsed from untyped
//!   field maps.
//!
//! # Invariants
//! - Every record is identified by a store-generated integer id.
//! - Drafts and patches are validated before any storage access.
//! - `updated_at` strictly advances on every mutation.

pub mod author;
pub mod book;
pub mod fields;
pub mod review;

use chrono::{DateTime, Duration, SubsecRound, Utc};

pub use fields::{FieldMap, ValidationError};

/// Returns the timestamp for a new mutation of a record last touched at
/// `previous`.
///
/// The result is truncated to microseconds and is always later than
/// `previous`, even when the wall clock has not moved.
pub fn next_timestamp(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now().trunc_subsecs(6);
    match previous {
        Some(previous) if now <= previous => previous + Duration::microseconds(1),
        _ => now,
    }
}
