use axum::http::StatusCode;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::{auth::token::TokenError, domain::value_objects::validation::ValidationError};

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl UseCaseError {
    pub fn not_found(message: impl Into<String>) -> Self {
        UseCaseError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        UseCaseError::Conflict(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            UseCaseError::NotFound(_) => StatusCode::NOT_FOUND,
            UseCaseError::Conflict(_) => StatusCode::CONFLICT,
            UseCaseError::Unauthorized(_) | UseCaseError::Token(_) => StatusCode::UNAUTHORIZED,
            UseCaseError::Validation(_) => StatusCode::BAD_REQUEST,
            UseCaseError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// True when a repository failure is Postgres rejecting a duplicate key. This
/// is how a lost race past a check-then-insert shows up.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<DieselError>(),
        Some(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
    )
}

pub type UseCaseResult<T> = std::result::Result<T, UseCaseError>;
