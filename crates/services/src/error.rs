//! Shared error types for the services crate.

use thiserror::Error;

use api::{ApiError, RestInitError};
use quiz_core::model::{QuestionError, SummaryError};

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    /// The question source could not be reached; carries its message only.
    #[error("{0}")]
    Fetch(String),
    #[error(transparent)]
    Summary(#[from] SummaryError),
}

impl From<ApiError> for QuizError {
    fn from(err: ApiError) -> Self {
        Self::Fetch(err.to_string())
    }
}

/// Errors emitted by `QuestionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionServiceError {
    #[error(transparent)]
    Invalid(#[from] QuestionError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("enter email and password")]
    MissingCredentials,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `RankingService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RankingError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Rest(#[from] RestInitError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_keeps_only_the_message() {
        let err = QuizError::from(ApiError::Rejected {
            status: 503,
            message: "maintenance".into(),
        });
        assert_eq!(err.to_string(), "maintenance");
    }
}
