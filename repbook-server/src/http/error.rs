use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use repbook::{Error, ErrorKind};
use serde_json::json;

/// A core error on its way out as `{"detail": ...}`.
#[derive(Debug)]
pub(crate) struct ApiError(pub Error);

pub(crate) type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub(crate) fn bad_request(message: impl std::fmt::Display) -> Self {
        ApiError(Error::invalid(message))
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

#[must_use]
pub(crate) fn error_status(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = error_status(self.0.kind());
        let detail = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {}", self.0);
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
