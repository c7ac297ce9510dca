//! Review use-case service.
//!
//! # Invariants
//! - `rating` outside `1..=5` is rejected before any write.
//! - `book_id` must reference an existing book at creation and is never
//!   updated afterwards.

use crate::model::book::BookId;
use crate::model::review::{NewReview, Review, ReviewId, ReviewPatch};
use crate::model::fields::required_integer;
use crate::model::{FieldMap, ValidationError};
use crate::repo::catalog_repo::{EntityKind, ReviewRepository};
use crate::repo::unit_of_work::Catalog;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::Deleted;
use log::info;

pub struct ReviewService<'a> {
    catalog: &'a Catalog,
}

impl<'a> ReviewService<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn list(&self) -> ServiceResult<Vec<Review>> {
        self.catalog
            .read("review_list", |repo| Ok(repo.list_reviews()?))
    }

    /// Lists reviews of one book in primary-key order.
    pub fn list_for_book(&self, book_id: BookId) -> ServiceResult<Vec<Review>> {
        self.catalog.read("review_list_for_book", |repo| {
            if !repo.exists(EntityKind::Book, book_id)? {
                return Err(ServiceError::not_found(EntityKind::Book, book_id));
            }
            Ok(repo.list_reviews_for_book(book_id)?)
        })
    }

    pub fn get(&self, id: ReviewId) -> ServiceResult<Review> {
        self.catalog.read("review_get", |repo| {
            repo.find_review(id)?
                .ok_or_else(|| ServiceError::not_found(EntityKind::Review, id))
        })
    }

    /// Creates a review (`rating`, `reviewer_name`, `book_id` required).
    ///
    /// The parent book is resolved before the remaining fields are
    /// validated, so an unknown book is reported as 404 even when other
    /// fields are invalid.
    pub fn create(&self, fields: &FieldMap) -> ServiceResult<Review> {
        let book_id = required_integer(fields, "book_id")?;
        self.insert(book_id, || NewReview::from_fields(fields))
    }

    pub fn create_draft(&self, draft: &NewReview) -> ServiceResult<Review> {
        self.insert(draft.book_id, || Ok(draft.clone()))
    }

    fn insert(
        &self,
        book_id: BookId,
        build: impl FnOnce() -> Result<NewReview, ValidationError>,
    ) -> ServiceResult<Review> {
        let review = self
            .catalog
            .write("review_create", |repo| -> ServiceResult<Review> {
                if !repo.exists(EntityKind::Book, book_id)? {
                    return Err(ServiceError::not_found(EntityKind::Book, book_id));
                }
                let draft = build()?;
                Ok(repo.insert_review(&draft)?)
            })?;
        info!(
            "event=review_create module=service status=ok id={} book_id={}",
            review.id, review.book_id
        );
        Ok(review)
    }

    /// Updates `rating`, `comment` and `reviewer_name`; `book_id` is ignored.
    pub fn update(&self, id: ReviewId, fields: &FieldMap) -> ServiceResult<Review> {
        self.catalog.write("review_update", |repo| -> ServiceResult<Review> {
            let mut review = repo
                .find_review(id)?
                .ok_or_else(|| ServiceError::not_found(EntityKind::Review, id))?;
            let patch = ReviewPatch::from_fields(fields)?;
            patch.apply_to(&mut review);
            Ok(repo.save_review(&review)?)
        })
    }

    pub fn delete(&self, id: ReviewId) -> ServiceResult<Deleted> {
        self.catalog
            .write("review_delete", |repo| -> ServiceResult<_> {
                Ok(repo.delete_review(id)?)
            })?;
        Ok(Deleted {
            message: format!("review {id} deleted"),
        })
    }
}
