//! Error responses.
//!
//! # Responsibilities
//! - Map handler failures to status codes
//! - Keep internal detail in the logs, out of the response body
//!
//! # Design Decisions
//! - All error bodies are plain text
//! - Panics are answered like any other internal error

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::any::Any;
use thiserror::Error;

use crate::pipeline::PipelineError;

const NOT_FOUND_BODY: &str = "Not found";
const INTERNAL_ERROR_BODY: &str = "Internal server error";

/// Errors returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response(),
            AppError::Pipeline(e) => {
                tracing::error!(error = %e, detail = ?e, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
            }
        }
    }
}

/// Fallback for unknown routes.
pub async fn not_found() -> AppError {
    AppError::NotFound
}

/// Convert a caught handler panic into a 500.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic"
    };
    tracing::error!(panic = %detail, "Handler panicked");
    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{ConvertError, ModelFormat};
    use crate::params::CanonicalParams;
    use axum::body::to_bytes;
    use std::sync::Arc;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_pipeline_error_hides_detail() {
        let err = AppError::from(PipelineError::Conversion {
            format: ModelFormat::Glb,
            key: CanonicalParams::default().cache_key(),
            source: Arc::new(ConvertError::Worker("secret stack".into())),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        assert_eq!(body, INTERNAL_ERROR_BODY);
        assert!(!body.contains("secret"));
    }

    #[tokio::test]
    async fn test_not_found_is_plain_text() {
        let response = not_found().await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        assert_eq!(body_text(response).await, NOT_FOUND_BODY);
    }

    #[tokio::test]
    async fn test_panic_handler() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, INTERNAL_ERROR_BODY);
    }
}
