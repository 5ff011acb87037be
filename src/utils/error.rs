use axum::extract::rejection::{FormRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid form body: {0}")]
    FormRejection(#[from] FormRejection),

    #[error("Invalid path parameters: {0}")]
    PathRejection(#[from] PathRejection),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::FormRejection(e) => match e {
                FormRejection::InvalidFormContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                FormRejection::FailedToDeserializeForm(_) => StatusCode::BAD_REQUEST,
                FormRejection::FailedToDeserializeFormBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::BAD_REQUEST,
            },
            // A record id that does not parse names no record.
            AppError::PathRejection(e) => match e {
                PathRejection::FailedToDeserializePathParams(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::FormRejection(_) => "INVALID_FORM",
            AppError::PathRejection(PathRejection::FailedToDeserializePathParams(_)) => "NOT_FOUND",
            AppError::PathRejection(_) => "INVALID_PATH",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn not_found(what: &str, id: i64) -> Self {
        AppError::NotFound(format!("{} with id '{}' was not found", what, id))
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(errors) => {
                error!(error = %errors, "Validation error");
            }
            AppError::FormRejection(e) => {
                error!(error = %e, "Form rejection");
            }
            AppError::PathRejection(e) => {
                error!(error = %e, "Path rejection");
            }
            AppError::NotFound(msg) | AppError::InternalServerError(msg) => {
                error!(error = ?self, message = %msg, "Application error");
            }
            AppError::DatabaseError(e) => {
                error!(error = ?e, "Database error");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        // Field errors are safe to show; database internals are not.
        let (public_message, details) = match &self {
            AppError::ValidationError(errors) => (
                "The submitted form is invalid".to_string(),
                serde_json::to_value(errors).ok(),
            ),
            AppError::FormRejection(e) => (e.body_text(), None),
            AppError::PathRejection(e) => (e.body_text(), None),
            AppError::NotFound(msg) | AppError::InternalServerError(msg) => (msg.clone(), None),
            AppError::DatabaseError(_) => ("A database error occurred".to_string(), None),
        };

        error_response(code, public_message, details, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::not_found("Event", 7).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::ValidationError(ValidationErrors::new()).code(),
            "VALIDATION_ERROR"
        );
    }

    #[test]
    fn test_database_error_is_not_exposed() {
        let response = AppError::DatabaseError(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_message_names_the_record() {
        let err = AppError::not_found("Category", 3);
        assert_eq!(
            err.to_string(),
            "Resource not found: Category with id '3' was not found"
        );
    }

    #[test]
    fn test_validation_error_response() {
        let mut errors = ValidationErrors::new();
        errors.add("category", ValidationError::new("does_not_exist"));
        let response = AppError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
