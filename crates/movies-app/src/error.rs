use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use tracing::{debug, error};

use crate::service::ServiceError;

pub type Error = anyhow::Error;
pub type Result<T, E = Error> = std::result::Result<T, E>;
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] garde::Report),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Validation(report) => ApiError::Validation(report),
            ServiceError::Repository(e) => ApiError::InternalError(e.to_string()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        ApiError::InternalError(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::ResourceNotFound(what) => {
                debug!("Resource not found: {what}");
                StatusCode::NOT_FOUND.into_response()
            }
            ApiError::InvalidRequest(msg) => {
                debug!("Invalid request: {msg}");
                StatusCode::BAD_REQUEST.into_response()
            }
            ApiError::Validation(report) => {
                debug!("Validation failed: {report}");
                (StatusCode::UNPROCESSABLE_ENTITY, Json(report)).into_response()
            }
            ApiError::InternalError(msg) => {
                error!("Internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
