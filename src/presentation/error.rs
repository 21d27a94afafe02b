// HTTP error responses
use crate::application::error::MonitorError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unknown signal kind '{0}'")]
    UnknownKind(String),

    #[error(transparent)]
    Monitor(#[from] MonitorError),
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::UnknownKind(_) => (StatusCode::NOT_FOUND, "UNKNOWN_KIND"),
            ApiError::Monitor(MonitorError::Source { .. }) => (StatusCode::BAD_GATEWAY, "SOURCE_ERROR"),
            ApiError::Monitor(MonitorError::SessionClosed) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SESSION_CLOSED")
            }
            ApiError::Monitor(MonitorError::AlreadyStarted) => (StatusCode::CONFLICT, "ALREADY_STARTED"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = ErrorBody {
            code,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
