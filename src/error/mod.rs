// Error types for csk-sniffer
// Author: kelexine (https://github.com/kelexine)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid image filename: {0}")]
    InvalidFilename(String),

    #[error("Detection pipeline failed: {0}")]
    Pipeline(String),

    #[error("Detection pipeline timed out after {0} seconds")]
    PipelineTimeout(u64),

    #[error("Internal error: {0}")]
    Internal(String),
}

// Convert AppError to HTTP responses for Axum
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request_error"),
            AppError::InvalidFilename(_) => (StatusCode::BAD_REQUEST, "invalid_filename_error"),
            AppError::Config(_) | AppError::ConfigParsing(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error")
            }
            AppError::Pipeline(_) => (StatusCode::BAD_GATEWAY, "pipeline_error"),
            AppError::PipelineTimeout(_) => (StatusCode::GATEWAY_TIMEOUT, "pipeline_timeout"),
            AppError::Template(_) => (StatusCode::INTERNAL_SERVER_ERROR, "template_error"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "api_error"),
        };

        let body = json!({
            "type": "error",
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
