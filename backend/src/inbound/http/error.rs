//! HTTP error payloads and mapping from domain errors.
//!
//! Keeps the domain free of transport concerns: [`DomainError`] values are
//! translated into Actix responses here. Two envelopes exist, matching the
//! API contract: validation failures answer `{"errors": [{field, message}]}`
//! and every other failure answers `{"message": "..."}`.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{DomainError, ErrorCode};

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    #[schema(example = "nombre")]
    pub field: String,
    #[schema(example = "nombre es requerido")]
    pub message: String,
}

impl FieldError {
    /// Build a field/message pair.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Body shape for validation failures.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ValidationErrorBody {
    pub errors: Vec<FieldError>,
}

/// Body shape for every non-validation failure.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageBody {
    #[schema(example = "Contacto no encontrado")]
    pub message: String,
}

/// Error returned by HTTP handlers.
#[derive(Debug, Clone)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    errors: Option<Vec<FieldError>>,
}

impl ApiError {
    /// Itemised validation failure; renders as `{"errors": [...]}`.
    #[must_use]
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self {
            code: ErrorCode::InvalidRequest,
            message: "Datos inválidos".into(),
            errors: Some(errors),
        }
    }

    /// Bad request with a single message body.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidRequest,
            message: message.into(),
            errors: None,
        }
    }

    /// Stable error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Message rendered in the `{message}` envelope.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    fn to_status_code(&self) -> StatusCode {
        match self.code {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(value: DomainError) -> Self {
        Self {
            code: value.code(),
            message: value.message().to_owned(),
            errors: None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.to_status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(errors) = &self.errors {
            return builder.json(json!({ "errors": errors }));
        }
        // Internal detail stays in the log; the body carries a fixed phrase.
        let message = if matches!(self.code, ErrorCode::InternalError) {
            "Error interno"
        } else {
            self.message.as_str()
        };
        builder.json(json!({ "message": message }))
    }
}

/// Convenience alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;
