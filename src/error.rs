use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::password::PasswordError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("could not validate user")]
    Unauthenticated,

    #[error("username is already taken")]
    DuplicateUsername,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] PasswordError),

    #[error("token issuance failed: {0}")]
    TokenIssue(#[from] jsonwebtoken::errors::Error),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::DuplicateUsername => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::PasswordHash(_) | AppError::TokenIssue(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = if status.is_server_error() {
            tracing::error!("request failed: {}", self);
            json!({
                "status": "error",
                "message": "Something bad happened while processing the request",
            })
        } else {
            json!({
                "status": "fail",
                "message": self.to_string(),
            })
        };

        let mut response = (status, Json(body)).into_response();
        if let AppError::Unauthenticated = self {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
