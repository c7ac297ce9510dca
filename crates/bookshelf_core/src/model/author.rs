//! Author record and its create/update inputs.

use super::fields::{optional_date, optional_string, replacement_string, required_string};
use super::{FieldMap, ValidationError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Store-generated author identity.
pub type AuthorId = i64;

/// Persisted author. Owns zero or more books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for author creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub bio: Option<String>,
}

impl NewAuthor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            birth_date: None,
            bio: None,
        }
    }

    pub fn from_fields(fields: &FieldMap) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required_string(fields, "name")?,
            birth_date: optional_date(fields, "birth_date")?.flatten(),
            bio: optional_string(fields, "bio")?.flatten(),
        })
    }
}

/// Partial author update. `None` leaves a field untouched; for optional
/// columns `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorPatch {
    pub name: Option<String>,
    pub birth_date: Option<Option<NaiveDate>>,
    pub bio: Option<Option<String>>,
}

impl AuthorPatch {
    pub fn from_fields(fields: &FieldMap) -> Result<Self, ValidationError> {
        Ok(Self {
            name: replacement_string(fields, "name")?,
            birth_date: optional_date(fields, "birth_date")?,
            bio: optional_string(fields, "bio")?,
        })
    }

    /// Merges present fields into `author`. Timestamps are left to the store.
    pub fn apply_to(&self, author: &mut Author) {
        if let Some(name) = &self.name {
            author.name = name.clone();
        }
        if let Some(birth_date) = self.birth_date {
            author.birth_date = birth_date;
        }
        if let Some(bio) = &self.bio {
            author.bio = bio.clone();
        }
    }
}
