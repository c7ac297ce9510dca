//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define per-entity data access contracts for authors, books, reviews.
//! - Isolate SQLite query details from service orchestration.
//! - Scope every service operation to exactly one unit of work.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - Cascading deletes walk the ownership graph explicitly and must run
//!   inside a unit of work.

pub mod catalog_repo;
pub mod unit_of_work;
