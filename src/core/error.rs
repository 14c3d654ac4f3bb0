//! Typed error handling for the service
//!
//! Every service operation returns [`ServiceError`], which maps onto an HTTP
//! status and a machine-readable code. Settlement races are not errors and
//! never show up here.
//!
//! # Example
//!
//! ```rust,ignore
//! match dealers.get(id).await {
//!     Ok(dealer) => println!("Found: {:?}", dealer),
//!     Err(ServiceError::NotFound { entity, key }) => println!("{} {} not found", entity, key),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use crate::core::store::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;

/// Message returned to clients instead of the details of a 5xx failure
pub const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred";

/// The error type of every service and engine operation
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Referenced or target entity is absent
    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    /// A business rule rejected the input (non-positive amount, duplicate email, ...)
    #[error("{0}")]
    InvalidArgument(String),

    /// Field-level validation of a request payload failed
    #[error("Input validation failed")]
    Validation(#[from] validator::ValidationErrors),

    /// The write collides with existing state
    #[error("{0}")]
    Conflict(String),

    /// Missing or invalid bearer token
    #[error("{0}")]
    Unauthorized(String),

    /// Storage backend failure
    #[error("storage failure: {0}")]
    Storage(StoreError),

    /// Anything else that should not happen in normal operation
    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ServiceError {
    pub fn not_found(entity: &'static str, key: impl Display) -> Self {
        ServiceError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ServiceError::InvalidArgument(message.into())
    }

    /// Report a missing referenced entity as a bad request
    ///
    /// Create routes answer 400 when the body points at a dealer that does
    /// not exist; the target of the request itself was not missing.
    pub fn into_bad_reference(self) -> Self {
        match self {
            ServiceError::NotFound { .. } => ServiceError::InvalidArgument(self.to_string()),
            other => other,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound { .. } => "NOT_FOUND",
            ServiceError::InvalidArgument(_) => "INVALID_ARGUMENT",
            ServiceError::Validation(_) => "VALIDATION_ERROR",
            ServiceError::Conflict(_) => "CONFLICT",
            ServiceError::Unauthorized(_) => "UNAUTHORIZED",
            ServiceError::Storage(_) => "STORAGE_ERROR",
            ServiceError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    ///
    /// Server-side failures keep their details out of the body.
    pub fn to_response(&self) -> ErrorResponse {
        let message = if self.status_code().is_server_error() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            self.to_string()
        };

        ErrorResponse {
            code: self.error_code().to_string(),
            message,
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ServiceError::NotFound { entity, key } => Some(serde_json::json!({
                "entity": entity,
                "key": key,
            })),
            ServiceError::Validation(errors) => {
                let fields: BTreeMap<String, Vec<String>> = errors
                    .field_errors()
                    .into_iter()
                    .map(|(field, errs)| {
                        let messages = errs
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            })
                            .collect();
                        (field.to_string(), messages)
                    })
                    .collect();
                Some(serde_json::json!({ "fields": fields }))
            }
            _ => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ServiceError::not_found(entity, id),
            StoreError::UniqueViolation { field: "email", .. } => {
                ServiceError::InvalidArgument(err.to_string())
            }
            StoreError::UniqueViolation { .. } | StoreError::AlreadyExists { .. } => {
                ServiceError::Conflict(err.to_string())
            }
            StoreError::Backend(_) => ServiceError::Storage(err),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}
