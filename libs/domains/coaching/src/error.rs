use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_helpers::{errors::error_response, AppError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoachingError {
    #[error("Coach tip not found: {0}")]
    TipNotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[from] crate::store::TipStoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CoachingResult<T> = Result<T, CoachingError>;

/// Convert CoachingError to AppError for standardized error responses
impl From<CoachingError> for AppError {
    fn from(err: CoachingError) -> Self {
        match err {
            CoachingError::TipNotFound(id) => {
                AppError::NotFound(format!("Coach tip {} not found", id))
            }
            CoachingError::Validation(msg) => AppError::BadRequest(msg),
            CoachingError::Store(e) => {
                AppError::InternalServerError(format!("Store error: {}", e))
            }
            CoachingError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CoachingError {
    fn into_response(self) -> Response {
        // The web tier keys "no tip yet" off this exact error code.
        if let CoachingError::TipNotFound(id) = &self {
            return error_response(
                StatusCode::NOT_FOUND,
                "tip_not_found",
                format!("Coach tip {} not found", id),
            );
        }

        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
