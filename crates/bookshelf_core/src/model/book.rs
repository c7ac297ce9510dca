//! Book record and its create/update inputs.

use super::author::AuthorId;
use super::fields::{
    optional_date, optional_number, optional_string, replacement_integer, replacement_string,
    required_integer, required_string,
};
use super::{FieldMap, ValidationError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub type BookId = i64;

/// Persisted book. Belongs to one author and owns zero or more reviews.
///
/// `isbn` is unique across all books when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub isbn: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub author_id: AuthorId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub isbn: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub author_id: AuthorId,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author_id: AuthorId) -> Self {
        Self {
            title: title.into(),
            isbn: None,
            publication_date: None,
            description: None,
            price: None,
            author_id,
        }
    }

    pub fn from_fields(fields: &FieldMap) -> Result<Self, ValidationError> {
        Ok(Self {
            title: required_string(fields, "title")?,
            isbn: optional_string(fields, "isbn")?.flatten(),
            publication_date: optional_date(fields, "publication_date")?.flatten(),
            description: optional_string(fields, "description")?.flatten(),
            price: optional_number(fields, "price")?.flatten(),
            author_id: required_integer(fields, "author_id")?,
        })
    }
}

/// Partial book update; see [`crate::model::author::AuthorPatch`] for the
/// absent/cleared convention.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub isbn: Option<Option<String>>,
    pub publication_date: Option<Option<NaiveDate>>,
    pub description: Option<Option<String>>,
    pub price: Option<Option<f64>>,
    pub author_id: Option<AuthorId>,
}

impl BookPatch {
    pub fn from_fields(fields: &FieldMap) -> Result<Self, ValidationError> {
        Ok(Self {
            title: replacement_string(fields, "title")?,
            isbn: optional_string(fields, "isbn")?,
            publication_date: optional_date(fields, "publication_date")?,
            description: optional_string(fields, "description")?,
            price: optional_number(fields, "price")?,
            author_id: replacement_integer(fields, "author_id")?,
        })
    }

    pub fn apply_to(&self, book: &mut Book) {
        if let Some(title) = &self.title {
            book.title = title.clone();
        }
        if let Some(isbn) = &self.isbn {
            book.isbn = isbn.clone();
        }
        if let Some(publication_date) = self.publication_date {
            book.publication_date = publication_date;
        }
        if let Some(description) = &self.description {
            book.description = description.clone();
        }
        if let Some(price) = self.price {
            book.price = price;
        }
        if let Some(author_id) = self.author_id {
            book.author_id = author_id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BookPatch, NewBook};
    use serde_json::json;

    #[test]
    fn new_book_requires_integer_author_id() {
        let fields = json!({"title": "T", "author_id": "1"})
            .as_object()
            .cloned()
            .unwrap();
        assert_eq!(NewBook::from_fields(&fields).unwrap_err().field, "author_id");
    }

    #[test]
    fn patch_accepts_price_clear() {
        let fields = json!({"price": null, "title": "New"})
            .as_object()
            .cloned()
            .unwrap();
        let patch = BookPatch::from_fields(&fields).unwrap();
        assert_eq!(patch.price, Some(None));
        assert_eq!(patch.title.as_deref(), Some("New"));
        assert_eq!(patch.author_id, None);
    }
}
