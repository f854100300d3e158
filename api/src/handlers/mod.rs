pub mod employees;
pub mod health;
pub mod metrics;

// Common response types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::errors::{StoreError, ValidationError};
use serde::Serialize;

/// Error returned by API handlers
///
/// Store failures keep their source for logging; the client only ever sees
/// the generic message attached to the failing operation.
#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    NotFound,
    Store {
        message: &'static str,
        source: StoreError,
    },
}

impl ApiError {
    /// Adapter for `map_err` that tags a store failure with its client message
    pub fn store(message: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| ApiError::Store { message, source }
    }

    /// Outcome label used for request metrics
    pub fn outcome(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::NotFound => "not_found",
            ApiError::Store { .. } => "store_error",
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

/// Standard API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub trace_id: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            trace_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(err) => {
                tracing::debug!(error = %err, "Rejected invalid request");
                (StatusCode::BAD_REQUEST, ErrorResponse::new(err.to_string()))
            }
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("Employee not found"),
            ),
            ApiError::Store { message, source } => {
                let body = ErrorResponse::new(message);
                tracing::error!(error = %source, trace_id = %body.trace_id, "{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_is_400() {
        let response = ApiError::Validation(ValidationError::InvalidSalary).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            "Salary is required and must be a positive number"
        );
        assert!(body["trace_id"].is_string());
    }

    #[tokio::test]
    async fn test_not_found_is_404() {
        let response = ApiError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Employee not found");
    }

    #[tokio::test]
    async fn test_store_error_is_500_without_detail() {
        let err = ApiError::store("Database error while adding employee")(
            StoreError::ConnectionFailed("password authentication failed".to_string()),
        );
        assert_eq!(err.outcome(), "store_error");

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Database error while adding employee");
        assert!(!body.to_string().contains("password"));
    }
}
