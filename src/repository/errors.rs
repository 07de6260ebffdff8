use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::domain::property::{DuplicateProperty, DuplicatePropertyName};
use crate::domain::types::TypeConstraintError;

/// Errors returned by repository implementations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    /// The targeted record does not exist.
    #[error("not found")]
    NotFound,
    /// A unique or foreign key constraint rejected the write.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    /// Stored or requested data breaks a domain rule.
    #[error("validation error: {0}")]
    ValidationError(String),
    /// No connection could be obtained from the pool.
    #[error("connection error: {0}")]
    Connection(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<DieselError> for RepositoryError {
    fn from(value: DieselError) -> Self {
        match value {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(
                kind @ (DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::CheckViolation),
                info,
            ) => {
                let what = match kind {
                    DatabaseErrorKind::UniqueViolation => "already exists",
                    DatabaseErrorKind::ForeignKeyViolation => "references a missing record",
                    _ => "check failed",
                };
                Self::ConstraintViolation(format!("{what}: {}", info.message()))
            }
            other => Self::Unexpected(other.to_string()),
        }
    }
}

impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(value: diesel::r2d2::PoolError) -> Self {
        Self::Connection(value.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(value: TypeConstraintError) -> Self {
        Self::ValidationError(value.to_string())
    }
}

impl From<DuplicatePropertyName> for RepositoryError {
    fn from(value: DuplicatePropertyName) -> Self {
        Self::ValidationError(value.to_string())
    }
}

impl From<DuplicateProperty> for RepositoryError {
    fn from(value: DuplicateProperty) -> Self {
        Self::ValidationError(value.to_string())
    }
}
