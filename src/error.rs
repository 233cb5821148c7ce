/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - RepoError / IdentityError を統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::identity::IdentityError;

/// Every failure leaves the API as `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("unauthorized: missing token")]
    MissingToken,
    #[error("unauthorized: invalid token")]
    InvalidToken,
    #[error("invalid credentials")]
    InvalidCredentials,
    /// The external provider refused or failed the call; its message is passed through.
    #[error("{0}")]
    Store(String),
    #[error("{resource} not found or not authorized")]
    NotFoundOrForbidden { resource: &'static str },
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found_or_forbidden(resource: &'static str) -> Self {
        Self::NotFoundOrForbidden { resource }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Store(_) => StatusCode::BAD_REQUEST,
            AppError::MissingToken | AppError::InvalidToken | AppError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AppError::NotFoundOrForbidden { .. } => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        tracing::warn!(error = %e, "book store call failed");
        AppError::Store(e.to_string())
    }
}

impl From<IdentityError> for AppError {
    fn from(e: IdentityError) -> Self {
        tracing::warn!(error = %e, "identity provider call failed");
        AppError::Store(e.to_string())
    }
}
