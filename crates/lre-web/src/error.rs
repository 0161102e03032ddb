//! JSON API error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lre_core::LreError;
use serde::Serialize;
use thiserror::Error;

/// Errors returned by the `/api` routes.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Analysis(#[from] LreError),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No analysis available")]
    NoResult,
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Analysis(e) => match e {
                LreError::NotAnImage(_) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, "NOT_AN_IMAGE"),
                LreError::InvalidDataUrl | LreError::UnsupportedExtension(_) => {
                    (StatusCode::BAD_REQUEST, "INVALID_IMAGE")
                }
                LreError::Service { .. }
                | LreError::Http(_)
                | LreError::EmptyResponse
                | LreError::MalformedResponse(_)
                | LreError::Json(_) => (StatusCode::BAD_GATEWAY, "ANALYSIS_FAILED"),
                LreError::Io(_) | LreError::Config(_) | LreError::Task(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                }
            },
            ApiError::AnalysisFailed(_) => (StatusCode::BAD_GATEWAY, "ANALYSIS_FAILED"),
            ApiError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            ApiError::NoResult => (StatusCode::NOT_FOUND, "NO_RESULT"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
