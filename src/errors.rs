// src/errors.rs
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionRankError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Analysis service error: {0}")]
    Analysis(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl VisionRankError {
    fn category(&self) -> &'static str {
        match self {
            VisionRankError::Storage(_) => "Storage error",
            VisionRankError::Analysis(_) => "AI service error",
            VisionRankError::Serialization(_) => "Data processing error",
            VisionRankError::ImageProcessing(_) => "Image processing error",
            VisionRankError::Validation(_) => "Validation error",
            VisionRankError::NotFound(_) => "Not found",
            VisionRankError::Forbidden(_) => "Curator access required",
        }
    }
}

impl ResponseError for VisionRankError {
    fn status_code(&self) -> StatusCode {
        match self {
            VisionRankError::Storage(_) | VisionRankError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            VisionRankError::Analysis(_) => StatusCode::SERVICE_UNAVAILABLE,
            VisionRankError::ImageProcessing(_) | VisionRankError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            VisionRankError::NotFound(_) => StatusCode::NOT_FOUND,
            VisionRankError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.category(),
            "message": self.to_string()
        }))
    }
}

impl From<redis::RedisError> for VisionRankError {
    fn from(e: redis::RedisError) -> Self {
        VisionRankError::Storage(e.to_string())
    }
}
