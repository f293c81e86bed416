use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

use crate::pipeline::ingest::IngestError;

/// Errors returned by the HTTP handlers as `{"message": ...}` bodies.
#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "{}", _0)]
    Ingest(IngestError),
    #[display(fmt = "Internal Server Error")]
    Internal,
}

impl std::error::Error for ApiError {}

impl From<IngestError> for ApiError {
    fn from(e: IngestError) -> Self {
        ApiError::Ingest(e)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Ingest(IngestError::InvalidCampus(_)) => StatusCode::BAD_REQUEST,
            ApiError::Ingest(IngestError::UnreadableFile(_) | IngestError::EmptyFile) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Ingest(IngestError::Storage(_)) | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        // storage details stay in the log
        let message = match self {
            ApiError::Ingest(IngestError::Storage(_)) => "Failed to save attendance data".to_string(),
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}
