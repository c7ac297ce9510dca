//! Book use-case service.
//!
//! # Invariants
//! - `author_id` must reference an existing author on create and on any
//!   update that supplies it.
//! - A duplicate `isbn` is reported as a conflict and leaves storage intact.

use crate::model::author::AuthorId;
use crate::model::book::{Book, BookId, BookPatch, NewBook};
use crate::model::fields::required_integer;
use crate::model::{FieldMap, ValidationError};
use crate::repo::catalog_repo::{BookRepository, EntityKind, SqliteCatalogRepository};
use crate::repo::unit_of_work::Catalog;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::Deleted;
use log::info;

pub struct BookService<'a> {
    catalog: &'a Catalog,
}

impl<'a> BookService<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn list(&self) -> ServiceResult<Vec<Book>> {
        self.catalog.read("book_list", |repo| Ok(repo.list_books()?))
    }

    pub fn get(&self, id: BookId) -> ServiceResult<Book> {
        self.catalog.read("book_get", |repo| {
            repo.find_book(id)?
                .ok_or_else(|| ServiceError::not_found(EntityKind::Book, id))
        })
    }

    /// Lists the books of one author. Unknown authors are reported as 404.
    pub fn list_by_author(&self, author_id: AuthorId) -> ServiceResult<Vec<Book>> {
        self.catalog.read("book_list_by_author", |repo| {
            ensure_author(repo, author_id)?;
            Ok(repo.list_books_by_author(author_id)?)
        })
    }

    /// Creates a book from untyped fields (`title`, `author_id` required).
    ///
    /// The author is resolved before the remaining fields are validated.
    pub fn create(&self, fields: &FieldMap) -> ServiceResult<Book> {
        let author_id = required_integer(fields, "author_id")?;
        self.insert(author_id, || NewBook::from_fields(fields))
    }

    pub fn create_draft(&self, draft: &NewBook) -> ServiceResult<Book> {
        self.insert(draft.author_id, || Ok(draft.clone()))
    }

    pub fn update(&self, id: BookId, fields: &FieldMap) -> ServiceResult<Book> {
        self.catalog
            .write("book_update", |repo| -> ServiceResult<Book> {
                let mut book = repo
                    .find_book(id)?
                    .ok_or_else(|| ServiceError::not_found(EntityKind::Book, id))?;
                let patch = BookPatch::from_fields(fields)?;
                if let Some(author_id) = patch.author_id {
                    ensure_author(repo, author_id)?;
                }
                patch.apply_to(&mut book);
                Ok(repo.save_book(&book)?)
            })
    }

    fn insert(
        &self,
        author_id: AuthorId,
        build: impl FnOnce() -> Result<NewBook, ValidationError>,
    ) -> ServiceResult<Book> {
        let book = self
            .catalog
            .write("book_create", |repo| -> ServiceResult<Book> {
                ensure_author(repo, author_id)?;
                let draft = build()?;
                Ok(repo.insert_book(&draft)?)
            })?;
        info!(
            "event=book_create module=service status=ok id={} author_id={}",
            book.id, book.author_id
        );
        Ok(book)
    }

    /// Deletes the book and its reviews.
    pub fn delete(&self, id: BookId) -> ServiceResult<Deleted> {
        let report = self
            .catalog
            .write("book_delete", |repo| -> ServiceResult<_> {
                Ok(repo.delete_book(id)?)
            })?;
        info!(
            "event=book_delete module=service status=ok id={id} reviews={}",
            report.reviews
        );
        Ok(Deleted {
            message: format!("book {id} deleted"),
        })
    }
}

fn ensure_author(repo: &SqliteCatalogRepository<'_>, author_id: AuthorId) -> ServiceResult<()> {
    if repo.exists(EntityKind::Author, author_id)? {
        Ok(())
    } else {
        Err(ServiceError::not_found(EntityKind::Author, author_id))
    }
}
