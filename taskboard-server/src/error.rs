//! HTTP error mapping

use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use taskboard_kanban::BoardError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("not logged in")]
    NoSession,

    #[error("missing or mismatched CSRF token")]
    Csrf,

    #[error("{0}")]
    Json(#[from] JsonRejection),

    #[error("{0}")]
    Query(#[from] QueryRejection),

    #[error("invalid upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("file field is missing")]
    MissingFile,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Board(err) => board_status(err),
            Self::NoSession => StatusCode::UNAUTHORIZED,
            Self::Csrf => StatusCode::FORBIDDEN,
            Self::Json(rejection) => rejection.status(),
            Self::Query(rejection) => rejection.status(),
            Self::Multipart(err) => err.status(),
            Self::MissingFile => StatusCode::BAD_REQUEST,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn board_status(err: &BoardError) -> StatusCode {
    match err {
        BoardError::Validation { .. } => StatusCode::BAD_REQUEST,
        BoardError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        BoardError::Forbidden { .. } => StatusCode::FORBIDDEN,
        BoardError::NotFound { .. } => StatusCode::NOT_FOUND,
        BoardError::Conflict { .. } | BoardError::AlreadyExists { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
