use axum::{
    extract::rejection::JsonRejection,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("Not found.")]
    NotFound,

    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal server error")]
    InternalError,
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_authenticated() -> Self {
        AppError::Unauthenticated("Authentication credentials were not provided.".to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Unauthenticated(detail) => {
                (StatusCode::UNAUTHORIZED, json!({ "detail": detail }))
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, json!({ "detail": "Not found." })),
            AppError::Validation { field, message } => {
                let mut errors = serde_json::Map::new();
                errors.insert(field, json!([message]));
                (StatusCode::BAD_REQUEST, serde_json::Value::Object(errors))
            }
            AppError::BadRequest(detail) => (StatusCode::BAD_REQUEST, json!({ "detail": detail })),
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "Internal server error" }),
                )
            }
            AppError::Io(ref e) => {
                tracing::error!("I/O error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "Internal server error" }),
                )
            }
            AppError::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "detail": "Internal server error" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::not_authenticated().into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::validation("name", "This field may not be blank.")
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InternalError.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_validation_body_is_keyed_by_field() {
        let response = AppError::validation("title", "This field may not be blank.").into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["title"][0], "This field may not be blank.");
    }
}
