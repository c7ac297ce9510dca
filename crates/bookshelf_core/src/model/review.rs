//! Review record and its create/update inputs.
//!
//! # Invariants
//! - `rating` is always within `1..=5`.
//! - `book_id` is fixed at creation; patches cannot carry it.

use super::book::BookId;
use super::fields::{optional_string, replacement_string, required_integer, required_string};
use super::{FieldMap, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::RangeInclusive;

pub type ReviewId = i64;

pub const RATING_RANGE: RangeInclusive<i64> = 1..=5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub rating: i64,
    pub comment: Option<String>,
    pub reviewer_name: String,
    pub book_id: BookId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub rating: i64,
    pub comment: Option<String>,
    pub reviewer_name: String,
    pub book_id: BookId,
}

impl NewReview {
    pub fn from_fields(fields: &FieldMap) -> Result<Self, ValidationError> {
        Ok(Self {
            rating: validate_rating(required_integer(fields, "rating")?)?,
            comment: optional_string(fields, "comment")?.flatten(),
            reviewer_name: required_string(fields, "reviewer_name")?,
            book_id: required_integer(fields, "book_id")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewPatch {
    pub rating: Option<i64>,
    pub comment: Option<Option<String>>,
    pub reviewer_name: Option<String>,
}

impl ReviewPatch {
    /// Parses a partial update. A `book_id` key is ignored.
    pub fn from_fields(fields: &FieldMap) -> Result<Self, ValidationError> {
        let rating = match fields.get("rating") {
            None => None,
            Some(Value::Null) => return Err(ValidationError::new("rating", "must not be null")),
            Some(_) => Some(validate_rating(required_integer(fields, "rating")?)?),
        };
        Ok(Self {
            rating,
            comment: optional_string(fields, "comment")?,
            reviewer_name: replacement_string(fields, "reviewer_name")?,
        })
    }

    pub fn apply_to(&self, review: &mut Review) {
        if let Some(rating) = self.rating {
            review.rating = rating;
        }
        if let Some(comment) = &self.comment {
            review.comment = comment.clone();
        }
        if let Some(reviewer_name) = &self.reviewer_name {
            review.reviewer_name = reviewer_name.clone();
        }
    }
}

/// Rejects ratings outside [`RATING_RANGE`].
pub fn validate_rating(rating: i64) -> Result<i64, ValidationError> {
    if RATING_RANGE.contains(&rating) {
        Ok(rating)
    } else {
        Err(ValidationError::new(
            "rating",
            format!(
                "must be between {} and {}, got {rating}",
                RATING_RANGE.start(),
                RATING_RANGE.end()
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_rating, NewReview, ReviewPatch};
    use serde_json::json;

    #[test]
    fn rating_bounds_are_inclusive() {
        assert!(validate_rating(0).is_err());
        assert_eq!(validate_rating(1).unwrap(), 1);
        assert_eq!(validate_rating(5).unwrap(), 5);
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn new_review_requires_rating() {
        let fields = json!({"reviewer_name": "R", "book_id": 1})
            .as_object()
            .cloned()
            .unwrap();
        assert_eq!(NewReview::from_fields(&fields).unwrap_err().field, "rating");
    }

    #[test]
    fn patch_rejects_out_of_range_rating() {
        let fields = json!({"rating": 9}).as_object().cloned().unwrap();
        assert!(ReviewPatch::from_fields(&fields).is_err());
    }
}
