//! Service error taxonomy.
//!
//! | kind         | status |
//! |--------------|--------|
//! | `Validation` | 400    |
//! | `NotFound`   | 404    |
//! | `Conflict`   | 409    |
//! | `Storage`    | 500    |

use crate::model::ValidationError;
use crate::repo::catalog_repo::{EntityKind, RepoError};
use crate::service::reply::{Status, StatusError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    /// Malformed or out-of-range input; detected before storage access.
    Validation(ValidationError),
    /// The target or a referenced record does not exist.
    NotFound { kind: EntityKind, id: i64 },
    /// A schema constraint rejected the change; the change was rolled back.
    Conflict(String),
    /// Any other persistence failure; the change was rolled back.
    Storage(String),
}

impl ServiceError {
    pub fn not_found(kind: EntityKind, id: i64) -> Self {
        Self::NotFound { kind, id }
    }
}

impl StatusError for ServiceError {
    fn status(&self) -> Status {
        match self {
            Self::Validation(_) => Status::BadRequest,
            Self::NotFound { .. } => Status::NotFound,
            Self::Conflict(_) => Status::Conflict,
            Self::Storage(_) => Status::ServerError,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid input: {err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Conflict(message) => {
                write!(f, "data integrity constraint violated: {message}")
            }
            Self::Storage(message) => write!(f, "storage failure: {message}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { kind, id } => Self::NotFound { kind, id },
            err if err.is_conflict() => Self::Conflict(err.to_string()),
            err => Self::Storage(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ServiceError;
    use crate::model::ValidationError;
    use crate::repo::catalog_repo::{EntityKind, RepoError};
    use crate::service::reply::{Status, StatusError};

    #[test]
    fn repo_not_found_keeps_entity_and_id() {
        let err = ServiceError::from(RepoError::NotFound {
            kind: EntityKind::Book,
            id: 7,
        });
        assert_eq!(err.status(), Status::NotFound);
        assert_eq!(err.to_string(), "book not found: 7");
    }

    #[test]
    fn unavailable_storage_is_server_error() {
        let err = ServiceError::from(RepoError::Unavailable("lock poisoned".to_string()));
        assert_eq!(err.status(), Status::ServerError);
        assert!(err.to_string().contains("lock poisoned"));
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let err = ServiceError::from(ValidationError::new("rating", "out of range"));
        assert_eq!(err.status(), Status::BadRequest);
    }
}
