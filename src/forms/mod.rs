//! Form definitions backing the client routes.

use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::forms::client::Violation;

pub mod client;
pub mod main;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("{}", join_messages(.0))]
    Invalid(Vec<Violation>),

    #[error("invalid start date")]
    InvalidDate,

    #[error("deletion was not confirmed")]
    NotConfirmed,

    #[error(transparent)]
    TypeConstraint(#[from] TypeConstraintError),
}

fn join_messages(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| violation.message.as_ref())
        .collect::<Vec<_>>()
        .join("\n")
}
