//! Request-independent business logic used by the HTTP handlers.

use thiserror::Error;

use crate::forms::FormError;
use crate::forms::client::Violation;
use crate::repository::errors::RepositoryError;

pub mod api;
pub mod client;
pub mod main;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("client not found")]
    NotFound,

    #[error("no client selected")]
    NoSelection,

    /// Submitted client values broke one or more rules.
    #[error("form validation failed")]
    Invalid(Vec<Violation>),

    #[error("{0}")]
    Form(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Invalid(violations) => ServiceError::Invalid(violations),
            other => ServiceError::Form(other.to_string()),
        }
    }
}
