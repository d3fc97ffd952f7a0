use actix_web::{error::ResponseError, HttpResponse};
use derive_more::Display;
use mongodb::error::Error as MongoError;
use serde_json::json;

/// Errors raised by the cache, providers, validation and rendering layers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed input to a public function.
    #[error("validation error: {0}")]
    Validation(String),

    /// A network request failed or returned a non-success status.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// A response body or cached payload is not valid JSON of the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// A token, chain, or cache entry lookup missed.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<MongoError> for Error {
    fn from(error: MongoError) -> Self {
        Error::Storage(error.to_string())
    }
}

#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "Internal server error")]
    InternalError,

    #[display(fmt = "Bad request: {}", _0)]
    BadRequest(String),

    #[display(fmt = "Not found: {}", _0)]
    NotFound(String),

    #[display(fmt = "Storage error: {}", _0)]
    StorageError(String),

    #[display(fmt = "Unauthorized: {}", _0)]
    Unauthorized(String),

    #[display(fmt = "Conflict: {}", _0)]
    Conflict(String),
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        match error {
            Error::Validation(message) => ApiError::BadRequest(message),
            Error::NotFound(message) => ApiError::NotFound(message),
            Error::Storage(message) => {
                log::error!("Storage error: {}", message);
                ApiError::StorageError(message)
            }
            other => {
                log::error!("Internal error: {}", other);
                ApiError::InternalError
            }
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        log::error!("Anyhow error: {}", error);
        ApiError::InternalError
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::InternalError => HttpResponse::InternalServerError().json(json!({
                "error": "Internal server error"
            })),
            ApiError::BadRequest(ref message) => HttpResponse::BadRequest().json(json!({
                "error": message
            })),
            ApiError::NotFound(ref message) => HttpResponse::NotFound().json(json!({
                "error": message
            })),
            // Backend detail is logged in `From<Error>`, not returned.
            ApiError::StorageError(_) => HttpResponse::InternalServerError().json(json!({
                "error": "Storage error"
            })),
            ApiError::Unauthorized(ref message) => HttpResponse::Unauthorized().json(json!({
                "error": message
            })),
            ApiError::Conflict(ref message) => HttpResponse::Conflict().json(json!({
                "error": message
            })),
        }
    }
}
