//! Author use-case service.
//!
//! # Invariants
//! - Input is validated before a unit of work starts.
//! - Deleting an author removes its books and their reviews atomically.

use crate::model::author::{Author, AuthorId, AuthorPatch, NewAuthor};
use crate::model::FieldMap;
use crate::repo::catalog_repo::{AuthorRepository, EntityKind};
use crate::repo::unit_of_work::Catalog;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::Deleted;
use log::info;

pub struct AuthorService<'a> {
    catalog: &'a Catalog,
}

impl<'a> AuthorService<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn list(&self) -> ServiceResult<Vec<Author>> {
        self.catalog
            .read("author_list", |repo| Ok(repo.list_authors()?))
    }

    pub fn get(&self, id: AuthorId) -> ServiceResult<Author> {
        self.catalog.read("author_get", |repo| {
            repo.find_author(id)?
                .ok_or_else(|| ServiceError::not_found(EntityKind::Author, id))
        })
    }

    /// Creates an author from untyped fields (`name` required).
    pub fn create(&self, fields: &FieldMap) -> ServiceResult<Author> {
        let draft = NewAuthor::from_fields(fields)?;
        self.create_draft(&draft)
    }

    pub fn create_draft(&self, draft: &NewAuthor) -> ServiceResult<Author> {
        let author = self
            .catalog
            .write("author_create", |repo| -> ServiceResult<Author> {
                Ok(repo.insert_author(draft)?)
            })?;
        info!(
            "event=author_create module=service status=ok id={}",
            author.id
        );
        Ok(author)
    }

    /// Applies only the keys present in `fields`.
    pub fn update(&self, id: AuthorId, fields: &FieldMap) -> ServiceResult<Author> {
        self.catalog.write("author_update", |repo| -> ServiceResult<Author> {
            let mut author = repo
                .find_author(id)?
                .ok_or_else(|| ServiceError::not_found(EntityKind::Author, id))?;
            let patch = AuthorPatch::from_fields(fields)?;
            patch.apply_to(&mut author);
            Ok(repo.save_author(&author)?)
        })
    }

    /// Deletes the author together with its books and their reviews.
    pub fn delete(&self, id: AuthorId) -> ServiceResult<Deleted> {
        let report = self
            .catalog
            .write("author_delete", |repo| -> ServiceResult<_> {
                Ok(repo.delete_author(id)?)
            })?;
        info!(
            "event=author_delete module=service status=ok id={id} books={} reviews={}",
            report.books, report.reviews
        );
        Ok(Deleted {
            message: format!("author {id} deleted"),
        })
    }
}
