use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidPayload(String),

    #[error("User already exists")]
    DuplicateUser,

    // Covers both an unknown login and a wrong password.
    #[error("Invalid login or password")]
    InvalidCredentials,

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Request timed out")]
    Timeout,

    #[error("Database error")]
    Storage(#[from] StoreError),

    #[error("Internal server error")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        AppError::InvalidPayload(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidPayload(_)
            | AppError::DuplicateUser
            | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Storage(e) => json!({ "message": self.to_string(), "error": e.to_string() }),
            AppError::Internal(detail) => json!({ "message": self.to_string(), "error": detail }),
            _ => json!({ "message": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
