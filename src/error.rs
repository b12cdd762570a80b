//! Error types for the result cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the result cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A write named a category with no registered TTL
    #[error("Unknown cache category: {0}")]
    UnknownCategory(String),

    /// Startup configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Ops API lookup of something that does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::UnknownCategory(_) => StatusCode::NOT_FOUND,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the result cache.
pub type Result<T> = std::result::Result<T, CacheError>;
