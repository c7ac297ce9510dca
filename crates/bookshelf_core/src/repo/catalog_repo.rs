//! Catalog repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `authors`, `books` and `reviews` tables.
//! - Own timestamp bookkeeping (`created_at`, `updated_at`).
//! - Walk author -> books -> reviews on delete.
//!
//! # Invariants
//! - Writes never bypass schema constraints; constraint failures surface as
//!   `RepoError::Db` and are classified by `RepoError::is_conflict`.
//! - Listing order is primary-key ascending.

use crate::db::DbError;
use crate::model::author::{Author, AuthorId, NewAuthor};
use crate::model::book::{Book, BookId, NewBook};
use crate::model::next_timestamp;
use crate::model::review::{NewReview, Review, ReviewId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const AUTHOR_SELECT_SQL: &str = "SELECT
    id,
    name,
    birth_date,
    bio,
    created_at,
    updated_at
FROM authors";

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    title,
    isbn,
    publication_date,
    description,
    price,
    author_id,
    created_at,
    updated_at
FROM books";

const REVIEW_SELECT_SQL: &str = "SELECT
    id,
    rating,
    comment,
    reviewer_name,
    book_id,
    created_at,
    updated_at
FROM reviews";

pub type RepoResult<T> = Result<T, RepoError>;

/// Entity kinds, used in not-found errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Author,
    Book,
    Review,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Book => "book",
            Self::Review => "review",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repository error for catalog persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound { kind: EntityKind, id: i64 },
    /// The shared connection cannot be used (for example a poisoned lock).
    Unavailable(String),
}

impl RepoError {
    /// Returns whether the failure came from a schema constraint
    /// (duplicate isbn, rating check, not-null, foreign key).
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Db(err) if err.is_constraint_violation())
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Unavailable(message) => write!(f, "catalog storage unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Rows removed by one cascading delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub authors: usize,
    pub books: usize,
    pub reviews: usize,
}

pub trait AuthorRepository {
    fn insert_author(&self, draft: &NewAuthor) -> RepoResult<Author>;
    fn find_author(&self, id: AuthorId) -> RepoResult<Option<Author>>;
    fn list_authors(&self) -> RepoResult<Vec<Author>>;
    /// Persists all mutable columns of `author` and advances `updated_at`.
    fn save_author(&self, author: &Author) -> RepoResult<Author>;
    /// Deletes the author, its books and their reviews.
    fn delete_author(&self, id: AuthorId) -> RepoResult<DeleteReport>;
}

pub trait BookRepository {
    fn insert_book(&self, draft: &NewBook) -> RepoResult<Book>;
    fn find_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    fn list_books(&self) -> RepoResult<Vec<Book>>;
    fn list_books_by_author(&self, author_id: AuthorId) -> RepoResult<Vec<Book>>;
    fn save_book(&self, book: &Book) -> RepoResult<Book>;
    /// Deletes the book and its reviews.
    fn delete_book(&self, id: BookId) -> RepoResult<DeleteReport>;
}

pub trait ReviewRepository {
    fn insert_review(&self, draft: &NewReview) -> RepoResult<Review>;
    fn find_review(&self, id: ReviewId) -> RepoResult<Option<Review>>;
    fn list_reviews(&self) -> RepoResult<Vec<Review>>;
    fn list_reviews_for_book(&self, book_id: BookId) -> RepoResult<Vec<Review>>;
    fn save_review(&self, review: &Review) -> RepoResult<Review>;
    fn delete_review(&self, id: ReviewId) -> RepoResult<DeleteReport>;
}

/// SQLite-backed repository for all three catalog tables.
///
/// Borrows a connection or an open transaction; it never begins or ends a
/// transaction itself.
pub struct SqliteCatalogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCatalogRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Counts rows in one catalog table.
    pub fn count(&self, kind: EntityKind) -> RepoResult<i64> {
        let table = table_name(kind);
        let count = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
                row.get(0)
            })?;
        Ok(count)
    }

    /// Returns whether a row with `id` exists in the table for `kind`.
    pub fn exists(&self, kind: EntityKind, id: i64) -> RepoResult<bool> {
        let table = table_name(kind);
        let exists: i64 = self.conn.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn delete_reviews_for_book(&self, book_id: BookId) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM reviews WHERE book_id = ?1;", [book_id])?;
        Ok(removed)
    }

    fn book_ids_for_author(&self, author_id: AuthorId) -> RepoResult<Vec<BookId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM books WHERE author_id = ?1 ORDER BY id ASC;")?;
        let ids = stmt
            .query_map([author_id], |row| row.get(0))?
            .collect::<Result<Vec<BookId>, _>>()?;
        Ok(ids)
    }

    fn query_all<T>(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
        parse: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> RepoResult<Vec<T>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse(row)?);
        }
        Ok(items)
    }
}

impl AuthorRepository for SqliteCatalogRepository<'_> {
    fn insert_author(&self, draft: &NewAuthor) -> RepoResult<Author> {
        let now = next_timestamp(None);
        self.conn.execute(
            "INSERT INTO authors (name, birth_date, bio, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![draft.name, draft.birth_date, draft.bio, now, now],
        )?;

        Ok(Author {
            id: self.conn.last_insert_rowid(),
            name: draft.name.clone(),
            birth_date: draft.birth_date,
            bio: draft.bio.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    fn find_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        let author = self
            .conn
            .query_row(
                &format!("{AUTHOR_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_author_row,
            )
            .optional()?;
        Ok(author)
    }

    fn list_authors(&self) -> RepoResult<Vec<Author>> {
        self.query_all(
            &format!("{AUTHOR_SELECT_SQL} ORDER BY id ASC;"),
            [],
            parse_author_row,
        )
    }

    fn save_author(&self, author: &Author) -> RepoResult<Author> {
        let updated_at = next_timestamp(Some(author.updated_at));
        let changed = self.conn.execute(
            "UPDATE authors
             SET
                name = ?1,
                birth_date = ?2,
                bio = ?3,
                updated_at = ?4
             WHERE id = ?5;",
            params![
                author.name,
                author.birth_date,
                author.bio,
                updated_at,
                author.id
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Author,
                id: author.id,
            });
        }

        Ok(Author {
            updated_at,
            ..author.clone()
        })
    }

    fn delete_author(&self, id: AuthorId) -> RepoResult<DeleteReport> {
        let mut report = DeleteReport::default();
        for book_id in self.book_ids_for_author(id)? {
            let removed = self.delete_book(book_id)?;
            report.books += removed.books;
            report.reviews += removed.reviews;
        }

        report.authors = self
            .conn
            .execute("DELETE FROM authors WHERE id = ?1;", [id])?;
        if report.authors == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Author,
                id,
            });
        }
        Ok(report)
    }
}

impl BookRepository for SqliteCatalogRepository<'_> {
    fn insert_book(&self, draft: &NewBook) -> RepoResult<Book> {
        let now = next_timestamp(None);
        self.conn.execute(
            "INSERT INTO books (
                title,
                isbn,
                publication_date,
                description,
                price,
                author_id,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                draft.title,
                draft.isbn,
                draft.publication_date,
                draft.description,
                draft.price,
                draft.author_id,
                now,
                now
            ],
        )?;

        Ok(Book {
            id: self.conn.last_insert_rowid(),
            title: draft.title.clone(),
            isbn: draft.isbn.clone(),
            publication_date: draft.publication_date,
            description: draft.description.clone(),
            price: draft.price,
            author_id: draft.author_id,
            created_at: now,
            updated_at: now,
        })
    }

    fn find_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        let book = self
            .conn
            .query_row(
                &format!("{BOOK_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_book_row,
            )
            .optional()?;
        Ok(book)
    }

    fn list_books(&self) -> RepoResult<Vec<Book>> {
        self.query_all(
            &format!("{BOOK_SELECT_SQL} ORDER BY id ASC;"),
            [],
            parse_book_row,
        )
    }

    fn list_books_by_author(&self, author_id: AuthorId) -> RepoResult<Vec<Book>> {
        self.query_all(
            &format!("{BOOK_SELECT_SQL} WHERE author_id = ?1 ORDER BY id ASC;"),
            [author_id],
            parse_book_row,
        )
    }

    fn save_book(&self, book: &Book) -> RepoResult<Book> {
        let updated_at = next_timestamp(Some(book.updated_at));
        let changed = self.conn.execute(
            "UPDATE books
             SET
                title = ?1,
                isbn = ?2,
                publication_date = ?3,
                description = ?4,
                price = ?5,
                author_id = ?6,
                updated_at = ?7
             WHERE id = ?8;",
            params![
                book.title,
                book.isbn,
                book.publication_date,
                book.description,
                book.price,
                book.author_id,
                updated_at,
                book.id
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Book,
                id: book.id,
            });
        }

        Ok(Book {
            updated_at,
            ..book.clone()
        })
    }

    fn delete_book(&self, id: BookId) -> RepoResult<DeleteReport> {
        let reviews = self.delete_reviews_for_book(id)?;
        let books = self.conn.execute("DELETE FROM books WHERE id = ?1;", [id])?;
        if books == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Book,
                id,
            });
        }
        Ok(DeleteReport {
            authors: 0,
            books,
            reviews,
        })
    }
}

impl ReviewRepository for SqliteCatalogRepository<'_> {
    fn insert_review(&self, draft: &NewReview) -> RepoResult<Review> {
        let now = next_timestamp(None);
        self.conn.execute(
            "INSERT INTO reviews (rating, comment, reviewer_name, book_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                draft.rating,
                draft.comment,
                draft.reviewer_name,
                draft.book_id,
                now,
                now
            ],
        )?;

        Ok(Review {
            id: self.conn.last_insert_rowid(),
            rating: draft.rating,
            comment: draft.comment.clone(),
            reviewer_name: draft.reviewer_name.clone(),
            book_id: draft.book_id,
            created_at: now,
            updated_at: now,
        })
    }

    fn find_review(&self, id: ReviewId) -> RepoResult<Option<Review>> {
        let review = self
            .conn
            .query_row(
                &format!("{REVIEW_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_review_row,
            )
            .optional()?;
        Ok(review)
    }

    fn list_reviews(&self) -> RepoResult<Vec<Review>> {
        self.query_all(
            &format!("{REVIEW_SELECT_SQL} ORDER BY id ASC;"),
            [],
            parse_review_row,
        )
    }

    fn list_reviews_for_book(&self, book_id: BookId) -> RepoResult<Vec<Review>> {
        self.query_all(
            &format!("{REVIEW_SELECT_SQL} WHERE book_id = ?1 ORDER BY id ASC;"),
            [book_id],
            parse_review_row,
        )
    }

    fn save_review(&self, review: &Review) -> RepoResult<Review> {
        let updated_at = next_timestamp(Some(review.updated_at));
        // book_id is immutable after creation.
        let changed = self.conn.execute(
            "UPDATE reviews
             SET
                rating = ?1,
                comment = ?2,
                reviewer_name = ?3,
                updated_at = ?4
             WHERE id = ?5;",
            params![
                review.rating,
                review.comment,
                review.reviewer_name,
                updated_at,
                review.id
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Review,
                id: review.id,
            });
        }

        Ok(Review {
            updated_at,
            ..review.clone()
        })
    }

    fn delete_review(&self, id: ReviewId) -> RepoResult<DeleteReport> {
        let reviews = self
            .conn
            .execute("DELETE FROM reviews WHERE id = ?1;", [id])?;
        if reviews == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Review,
                id,
            });
        }
        Ok(DeleteReport {
            reviews,
            ..DeleteReport::default()
        })
    }
}

fn table_name(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Author => "authors",
        EntityKind::Book => "books",
        EntityKind::Review => "reviews",
    }
}

fn parse_author_row(row: &Row<'_>) -> rusqlite::Result<Author> {
    Ok(Author {
        id: row.get("id")?,
        name: row.get("name")?,
        birth_date: row.get("birth_date")?,
        bio: row.get("bio")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_book_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get("id")?,
        title: row.get("title")?,
        isbn: row.get("isbn")?,
        publication_date: row.get("publication_date")?,
        description: row.get("description")?,
        price: row.get("price")?,
        author_id: row.get("author_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_review_row(row: &Row<'_>) -> rusqlite::Result<Review> {
    Ok(Review {
        id: row.get("id")?,
        rating: row.get("rating")?,
        comment: row.get("comment")?,
        reviewer_name: row.get("reviewer_name")?,
        book_id: row.get("book_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
