//! API error types for handler operations
//!
//! Handlers return [`ApiError`], which turns itself into an HTTP response. The
//! status for each [`ApiErrorKind`] comes from one `const fn` table, so no
//! handler picks status codes by hand.
//!
//! Validation failures render as a bare `{"field": "message"}` object. Every
//! other kind renders as
//! `{"error", "code", "status", "operation", "entity_type", "entity_id"}`.
//!
//! # Example
//!
//! ```rust
//! use person_service::handlers::{ApiError, ApiErrorKind};
//!
//! let error = ApiError::not_found("Person", "999999");
//! assert!(matches!(error.kind, ApiErrorKind::NotFound));
//! assert_eq!(error.message, "Could not find person with id: <999999>.");
//! ```

use std::fmt;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::person::FieldErrors;
use crate::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};

/// Handler operation in progress when the error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// Listing the collection
    List,
    /// Reading one person
    Get,
    /// Creating a person
    Create,
    /// Replacing every mutable field
    Update,
    /// Replacing one named field
    UpdateField,
    /// Deleting a person
    Delete,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::UpdateField => write!(f, "update_field"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Category of API error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Requested person does not exist
    NotFound,
    /// Duplicate key
    AlreadyExists,
    /// Required fields blank at write time
    ValidationFailed,
    /// Malformed path or body
    BadRequest,
    /// Store constraint violated
    Conflict,
    /// Unexpected failure
    InternalError,
    /// Store unreachable or timing out
    ServiceUnavailable,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::AlreadyExists => write!(f, "already_exists"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::BadRequest => write!(f, "bad_request"),
            Self::Conflict => write!(f, "conflict"),
            Self::InternalError => write!(f, "internal_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
        }
    }
}

impl ApiErrorKind {
    /// HTTP status for this kind
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists | Self::Conflict => StatusCode::CONFLICT,
            Self::ValidationFailed | Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Machine-readable code, e.g. `NOT_FOUND`
    #[must_use]
    pub fn error_code(&self) -> String {
        format!("{}", self).to_uppercase()
    }
}

/// Structured API error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The operation being performed when the error occurred
    pub operation: ApiOperation,
    /// The category of error
    pub kind: ApiErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of entity involved
    pub entity_type: Option<String>,
    /// The id of the entity involved
    pub entity_id: Option<String>,
    /// Per-field messages, set for validation failures
    pub field_errors: Option<FieldErrors>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
            field_errors: None,
        }
    }

    /// Create a "not found" error naming the missing id
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        let entity_type = entity_type.into();
        let entity_id = entity_id.into();
        Self {
            message: format!(
                "Could not find {} with id: <{}>.",
                entity_type.to_lowercase(),
                entity_id
            ),
            entity_type: Some(entity_type),
            entity_id: Some(entity_id),
            ..Self::new(ApiOperation::Get, ApiErrorKind::NotFound, "")
        }
    }

    /// Create a validation error from per-field messages
    pub fn validation_failed(field_errors: FieldErrors) -> Self {
        Self {
            field_errors: Some(field_errors),
            ..Self::new(
                ApiOperation::Create,
                ApiErrorKind::ValidationFailed,
                "Validation failed",
            )
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::Get, ApiErrorKind::BadRequest, message)
    }

    /// Add entity context to an existing error
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: ApiOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Transient errors that may succeed on retry
    pub fn is_retriable(&self) -> bool {
        matches!(self.kind, ApiErrorKind::ServiceUnavailable)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Serialize, Deserialize)]
struct ApiErrorResponse {
    error: String,
    code: String,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();

        if status.is_server_error() {
            tracing::error!(
                operation = %self.operation,
                kind = %self.kind,
                entity_type = ?self.entity_type,
                entity_id = ?self.entity_id,
                retriable = self.is_retriable(),
                "API error: {}", self.message
            );
        } else {
            tracing::warn!(
                operation = %self.operation,
                kind = %self.kind,
                entity_type = ?self.entity_type,
                entity_id = ?self.entity_id,
                fields = ?self.field_errors.as_ref().map(|f| f.keys().collect::<Vec<_>>()),
                "API error: {}", self.message
            );
        }

        if let Some(field_errors) = self.field_errors {
            return (status, Json(field_errors)).into_response();
        }

        let response = ApiErrorResponse {
            error: self.message,
            code: self.kind.error_code(),
            status: status.as_u16(),
            operation: Some(self.operation.to_string()),
            entity_type: self.entity_type,
            entity_id: self.entity_id,
        };

        (status, Json(response)).into_response()
    }
}

fn repository_operation_to_api_operation(op: RepositoryOperation) -> ApiOperation {
    match op {
        RepositoryOperation::FindById => ApiOperation::Get,
        RepositoryOperation::FindAll | RepositoryOperation::Count => ApiOperation::List,
        RepositoryOperation::Save | RepositoryOperation::Migrate => ApiOperation::Create,
        RepositoryOperation::Delete => ApiOperation::Delete,
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        let operation = repository_operation_to_api_operation(err.operation);

        let kind = match err.kind {
            RepositoryErrorKind::NotFound => ApiErrorKind::NotFound,
            RepositoryErrorKind::AlreadyExists => ApiErrorKind::AlreadyExists,
            RepositoryErrorKind::ConstraintViolation => ApiErrorKind::Conflict,
            RepositoryErrorKind::ConnectionFailed | RepositoryErrorKind::Timeout => {
                ApiErrorKind::ServiceUnavailable
            }
            RepositoryErrorKind::DatabaseError
            | RepositoryErrorKind::SerializationError
            | RepositoryErrorKind::Other => ApiErrorKind::InternalError,
        };

        // Internal details go to the log, never to the client
        let message = match kind {
            ApiErrorKind::ServiceUnavailable => {
                tracing::warn!(error = %err, "store unavailable");
                "Service temporarily unavailable".to_string()
            }
            ApiErrorKind::InternalError => {
                tracing::error!(error = %err, "store failure");
                "An internal error occurred".to_string()
            }
            _ => err.message,
        };

        Self {
            operation,
            kind,
            message,
            entity_type: err.entity_type,
            entity_id: err.entity_id,
            field_errors: None,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_operation_display() {
        assert_eq!(format!("{}", ApiOperation::List), "list");
        assert_eq!(format!("{}", ApiOperation::Get), "get");
        assert_eq!(format!("{}", ApiOperation::Create), "create");
        assert_eq!(format!("{}", ApiOperation::Update), "update");
        assert_eq!(format!("{}", ApiOperation::UpdateField), "update_field");
        assert_eq!(format!("{}", ApiOperation::Delete), "delete");
    }

    #[test]
    fn test_api_error_kind_status_codes() {
        assert_eq!(ApiErrorKind::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiErrorKind::AlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiErrorKind::ValidationFailed.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiErrorKind::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiErrorKind::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiErrorKind::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiErrorKind::ServiceUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_api_error_kind_error_codes() {
        assert_eq!(ApiErrorKind::NotFound.error_code(), "NOT_FOUND");
        assert_eq!(ApiErrorKind::ValidationFailed.error_code(), "VALIDATION_FAILED");
        assert_eq!(ApiErrorKind::ServiceUnavailable.error_code(), "SERVICE_UNAVAILABLE");
    }

    #[test]
    fn test_not_found_message() {
        let error = ApiError::not_found("Person", "999999");
        assert_eq!(error.message, "Could not find person with id: <999999>.");
        assert_eq!(error.entity_type.as_deref(), Some("Person"));
        assert_eq!(error.entity_id.as_deref(), Some("999999"));
        assert_eq!(error.operation, ApiOperation::Get);
    }

    #[test]
    fn test_validation_failed_keeps_fields() {
        let mut fields = FieldErrors::new();
        fields.insert("email".to_string(), "email is mandatory".to_string());

        let error = ApiError::validation_failed(fields.clone());
        assert_eq!(error.kind, ApiErrorKind::ValidationFailed);
        assert_eq!(error.field_errors, Some(fields));
    }

    #[test]
    fn test_from_repository_hides_internal_details() {
        let repo_error =
            RepositoryError::database_error(RepositoryOperation::Save, "relation does not exist");
        let error: ApiError = repo_error.into();

        assert_eq!(error.kind, ApiErrorKind::InternalError);
        assert_eq!(error.operation, ApiOperation::Create);
        assert_eq!(error.message, "An internal error occurred");
    }

    #[test]
    fn test_from_repository_connection_failure() {
        let error: ApiError = RepositoryError::connection_failed("refused")
            .with_operation(RepositoryOperation::FindAll)
            .into();

        assert_eq!(error.kind, ApiErrorKind::ServiceUnavailable);
        assert_eq!(error.operation, ApiOperation::List);
        assert_eq!(error.message, "Service temporarily unavailable");
        assert!(error.is_retriable());
    }

    #[test]
    fn test_from_repository_not_found_keeps_entity() {
        let error: ApiError = RepositoryError::not_found("Person", "5").into();
        assert_eq!(error.kind, ApiErrorKind::NotFound);
        assert_eq!(error.entity_id.as_deref(), Some("5"));
    }

    #[test]
    fn test_display_with_entity() {
        let display = ApiError::not_found("Person", "1").to_string();
        assert!(display.contains("not_found"));
        assert!(display.contains("[Person: 1]"));
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::not_found("Person", "1").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::validation_failed(FieldErrors::new()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
