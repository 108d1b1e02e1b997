use std::sync::Arc;

use platform_authn::AuthnError;
use products_hr::StoreError;
use thiserror::Error;

mod form;

pub use form::EmployeeForm;

/// Shared result type for suite surfaces.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    InvalidInput(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("internal error")]
    Internal(Arc<anyhow::Error>),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self::Internal(Arc::new(err))
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(format!("employee {}", id.into()))
    }

    /// Underlying cause for internal errors, for logging only.
    pub fn source_error(&self) -> Option<&anyhow::Error> {
        match self {
            ApiError::Internal(err) => Some(err),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::internal(value)
    }
}

impl From<AuthnError> for ApiError {
    fn from(value: AuthnError) -> Self {
        match value {
            AuthnError::InvalidInput(msg) => Self::InvalidInput(msg),
            AuthnError::InvalidCredentials | AuthnError::NotSignedIn => Self::Unauthorized,
            other => Self::internal(other.into()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateEmail(email) => {
                Self::Conflict(format!("an employee with email {email} already exists"))
            }
            other => Self::internal(other.into()),
        }
    }
}
