use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

/// A single field-level validation failure, surfaced in the `errors` array of
/// a 422 response body.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// ApiError
///
/// The application-wide error type. Handlers and extractors return this and
/// let `?` do the plumbing; `IntoResponse` renders the JSON envelope the
/// frontend expects (`{"status": "error", "message": ...}` plus field errors
/// for validation failures).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    RateLimited(String),
    #[error("Internal server error")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl ApiError {
    pub fn not_found(what: &str) -> Self {
        Self::NotFound(format!("{what} not found"))
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self::Internal(err.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Database errors map onto the same HTTP statuses the original backend used
/// for the matching Mongo error codes: unique violations become 409, a
/// missing row becomes 404, everything else is a logged 500.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::Conflict(
                "Duplicate field value. Please use another value.".to_string(),
            ),
            _ => Self::internal(err),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal failures are logged with their source chain and masked in
        // the response body.
        if let Self::Internal(source) = &self {
            tracing::error!(error = %source, "request failed");
        }

        let errors = match &self {
            Self::Validation(fields) => Some(fields.clone()),
            _ => None,
        };

        let body = ErrorBody {
            status: "error",
            message: self.to_string(),
            errors,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_body_carries_field_errors() {
        let err = ApiError::Validation(vec![FieldError::new("title", "Title is required")]);
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let rendered = serde_json::to_value(ErrorBody {
            status: "error",
            message: err.to_string(),
            errors: match &err {
                ApiError::Validation(f) => Some(f.clone()),
                _ => None,
            },
        })
        .unwrap();
        assert_eq!(rendered["status"], "error");
        assert_eq!(rendered["errors"][0]["field"], "title");
    }

    #[test]
    fn row_not_found_maps_to_404() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn plain_errors_omit_the_errors_array() {
        let body = serde_json::to_value(ErrorBody {
            status: "error",
            message: "Page not found".to_string(),
            errors: None,
        })
        .unwrap();
        assert!(body.get("errors").is_none());
    }
}
