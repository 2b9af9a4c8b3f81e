//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for the insights service.
///
/// Every layer returns this type so that the REST boundary can map any
/// failure to a status code and a machine-readable error code.
#[derive(Error, Debug)]
pub enum InsightsError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("{resource_type} '{id}' not found")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request is well-formed but cannot be served as asked
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Conflict error (e.g., duplicate entry)
    #[error("Conflict: {0}")]
    Conflict(String),

    // ============ Infrastructure Errors ============
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// External service error
    #[error("External service error: {service} - {message}")]
    ExternalService { service: String, message: String },

    /// Redis/Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    // ============ Resilience Errors ============
    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InsightsError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) | Self::BadRequest(_) => 400,
            Self::Conflict(_) => 409,
            Self::Timeout(_) => 503,
            Self::RateLimitExceeded => 429,
            Self::ExternalService { .. } => 502,
            Self::Database(_)
            | Self::Configuration(_)
            | Self::Cache(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::ExternalService { .. } => "EXTERNAL_SERVICE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a bad request error.
    #[must_use]
    pub fn bad_request<T: Into<String>>(message: T) -> Self {
        Self::BadRequest(message.into())
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates an external service error.
    #[must_use]
    pub fn external<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error is retriable.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::ExternalService { .. }
                | Self::Cache(_)
                | Self::Timeout(_)
                | Self::RateLimitExceeded
        )
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for InsightsError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    return Self::Conflict(db_err.message().to_string());
                }
                if db_err.is_foreign_key_violation() {
                    return Self::Validation(db_err.message().to_string());
                }
                Self::Database(err.to_string())
            }
            sqlx::Error::PoolTimedOut => Self::Timeout("database pool acquire".to_string()),
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for InsightsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-level validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl ErrorResponse {
    /// Creates a new error response from an `InsightsError`.
    #[must_use]
    pub fn from_error(error: &InsightsError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
        }
    }

    /// Sets field-level validation errors.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&InsightsError> for ErrorResponse {
    fn from(error: &InsightsError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(InsightsError::not_found("Page", "acme").status_code(), 404);
        assert_eq!(InsightsError::validation("bad page size").status_code(), 400);
        assert_eq!(InsightsError::bad_request("too few pages").status_code(), 400);
        assert_eq!(InsightsError::conflict("duplicate").status_code(), 409);
        assert_eq!(InsightsError::RateLimitExceeded.status_code(), 429);
        assert_eq!(InsightsError::external("linkedin", "503").status_code(), 502);
        assert_eq!(InsightsError::Timeout("t".to_string()).status_code(), 503);
        assert_eq!(InsightsError::Database("db".to_string()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(InsightsError::not_found("Post", 1).error_code(), "NOT_FOUND");
        assert_eq!(InsightsError::validation("x").error_code(), "VALIDATION_ERROR");
        assert_eq!(InsightsError::bad_request("x").error_code(), "BAD_REQUEST");
        assert_eq!(InsightsError::internal("err").error_code(), "INTERNAL_ERROR");
        assert_eq!(
            InsightsError::external("openai", "boom").error_code(),
            "EXTERNAL_SERVICE_ERROR"
        );
    }

    #[test]
    fn test_not_found_message_names_resource() {
        let err = InsightsError::not_found("Page", "deepsolv");
        assert_eq!(err.to_string(), "Page 'deepsolv' not found");
    }

    #[test]
    fn test_retriable_errors() {
        assert!(InsightsError::Database("connection lost".to_string()).is_retriable());
        assert!(InsightsError::external("linkedin", "reset").is_retriable());
        assert!(InsightsError::RateLimitExceeded.is_retriable());
        assert!(!InsightsError::not_found("Page", 1).is_retriable());
        assert!(!InsightsError::validation("bad input").is_retriable());
        assert!(!InsightsError::bad_request("too many").is_retriable());
    }

    #[test]
    fn test_error_response_from_error() {
        let err = InsightsError::not_found("Page", 1);
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.code, "NOT_FOUND");
        assert!(!response.message.is_empty());
        assert!(response.details.is_none());
    }

    #[test]
    fn test_error_response_with_details() {
        let err = InsightsError::validation("bad input");
        let details = vec![FieldError {
            field: "page_size".to_string(),
            message: "must be between 1 and 100".to_string(),
            code: "range".to_string(),
        }];
        let response = ErrorResponse::from_error(&err).with_details(details);
        assert_eq!(response.details.map(|d| d.len()), Some(1));
    }
}
