use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::store::{StoreError, ValidationError};

/// Error surfaced to HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        field: Option<&'static str>,
        message: String,
    },
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthenticated(&'static str),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    NotFound(String),
    #[error("Not implemented")]
    NotImplemented,
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found() -> Self {
        Self::NotFound("Not found.".to_string())
    }

    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: Some(field),
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED {
            error!(error = %self, "request failed");
        }

        let body = match &self {
            ApiError::Validation {
                field: Some(field), ..
            } => json!({ "error": self.to_string(), "field": field }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Duplicate { fields, .. } => Self::Validation {
                field: Some(fields),
                message: value.to_string(),
            },
            StoreError::MissingReference { field, .. } => Self::Validation {
                field: Some(field),
                message: value.to_string(),
            },
            StoreError::Invalid(err) => Self::Validation {
                field: Some(err.field),
                message: err.to_string(),
            },
            StoreError::NotFound { .. } => Self::not_found(),
            StoreError::Unavailable(_) => Self::Internal(value.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        Self::Validation {
            field: Some(value.field),
            message: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        Self::Internal(value.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn store_errors_map_to_client_errors() {
        let duplicate = ApiError::from(StoreError::Duplicate {
            table: "departments",
            fields: "code",
        });
        assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(duplicate, ApiError::Validation { field: Some("code"), .. }));

        let invalid = ApiError::from(StoreError::Invalid(ValidationError::new("rating", "bad")));
        assert_eq!(invalid.to_string(), "rating: bad");

        let missing = ApiError::from(StoreError::NotFound {
            table: "courses",
            id: Uuid::nil(),
        });
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let poisoned = ApiError::from(StoreError::Unavailable("lock".into()));
        assert_eq!(poisoned.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
