use thiserror::Error;

use crate::repository::RepositoryError;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The user is not allowed to perform the operation.
    #[error("unauthorized")]
    Unauthorized,
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// Submitted data was rejected.
    #[error("{0}")]
    Form(String),
    /// A value broke a domain type constraint.
    #[error("{0}")]
    TypeConstraint(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Maps a repository failure onto the error reported to callers.
///
/// Rule and constraint violations are the caller's fault and keep their
/// message; everything else is logged and hidden behind [`ServiceError::Internal`].
pub fn repository_failure(action: &str, err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::NotFound => ServiceError::NotFound,
        RepositoryError::ValidationError(message)
        | RepositoryError::ConstraintViolation(message) => {
            log::info!("Rejected attempt to {action}: {message}");
            ServiceError::Form(message)
        }
        err => {
            log::error!("Failed to {action}: {err}");
            ServiceError::Internal
        }
    }
}
