//! Source of candidate exercises for next-session suggestions.

use std::future::Future;

use thiserror::Error;

use crate::domain::exercise::Exercise;

#[cfg(feature = "server")]
pub mod http;

/// Errors raised while loading the exercise catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request could not be sent or the connection failed.
    #[error("network error: {0}")]
    Network(String),

    /// The catalog answered with a non-success status.
    #[error("unexpected status: {0}")]
    Status(u16),

    /// The payload was not a list of exercises.
    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Loads the full list of candidate exercises.
pub trait ExerciseCatalog {
    fn fetch_exercises(&self) -> impl Future<Output = CatalogResult<Vec<Exercise>>>;
}
