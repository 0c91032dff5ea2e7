//! Mapping of service failures onto HTTP responses.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use navsphere_engine::ContentError;
use navsphere_types::FieldViolation;
use navsphere_util::redact_sensitive;
use serde::Serialize;
use tracing::error;

/// Error returned by route handlers. Serialized as `{ "error", "violations"? }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    violations: Vec<FieldViolation>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "no_violations")]
    violations: &'a [FieldViolation],
}

fn no_violations(violations: &&[FieldViolation]) -> bool {
    violations.is_empty()
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            violations: Vec::new(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Translate a service error. Store and serialization failures are logged
    /// and reported to the caller only as `failure`.
    pub fn from_content(source: ContentError, failure: &str) -> Self {
        match source {
            ContentError::NavigationNotFound(_) | ContentError::CategoryNotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, source.to_string())
            }
            ContentError::Conflict(_) => Self::new(StatusCode::CONFLICT, source.to_string()),
            ContentError::InvalidIndex { .. } => Self::new(StatusCode::BAD_REQUEST, source.to_string()),
            ContentError::Validation(violations) => Self {
                status: StatusCode::BAD_REQUEST,
                message: "Validation failed".to_string(),
                violations,
            },
            ContentError::Store(_) | ContentError::Serialization { .. } => {
                error!(error = %redact_sensitive(&source.to_string()), "{failure}");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, failure)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Malformed and ill-typed bodies are both 400.
        let status = match &rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => StatusCode::BAD_REQUEST,
            _ => rejection.status(),
        };
        Self::new(status, rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: &self.message,
            violations: &self.violations,
        };
        (self.status, Json(body)).into_response()
    }
}
