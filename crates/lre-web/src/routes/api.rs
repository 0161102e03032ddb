//! JSON API handlers.

use axum::{extract::State, Json};
use lre_core::ingest::UploadedImage;
use lre_core::session::{Completion, SessionStatus};
use lre_core::AnalysisOutcome;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::{AnalysisRun, AppState};

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "lre-web",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: SessionStatus,
    pub request_id: u64,
    pub has_preview: bool,
}

/// GET /api/status
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let session = state.session.read().await;
    Json(StatusResponse {
        status: session.status(),
        request_id: session.latest_request_id(),
        has_preview: session.image().is_some(),
    })
}

/// GET /api/result
pub async fn result(State(state): State<AppState>) -> Result<Json<AnalysisOutcome>, ApiError> {
    let session = state.session.read().await;
    session.outcome().cloned().map(Json).ok_or(ApiError::NoResult)
}

/// Image supplied either as a data URL or as payload plus MIME type.
#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub data_url: Option<String>,
    pub data: Option<String>,
    pub mime_type: Option<String>,
}

impl AnalyzeRequest {
    fn into_image(self) -> Result<UploadedImage, ApiError> {
        match (self.data_url, self.data, self.mime_type) {
            (Some(url), _, _) => Ok(UploadedImage::from_data_url(&url)?),
            (None, Some(data), Some(mime_type)) => {
                let url = format!("data:{};base64,{}", mime_type, data);
                Ok(UploadedImage::from_data_url(&url)?)
            }
            _ => Err(ApiError::InvalidRequest(
                "expected 'data_url' or 'data' with 'mime_type'".to_string(),
            )),
        }
    }
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub request_id: u64,
    /// False when a newer request superseded this one.
    pub applied: bool,
    pub outcome: Option<AnalysisOutcome>,
}

/// POST /api/analyze
pub async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let image = req.into_image()?;
    let run = state.run_analysis(image).await;
    analysis_response(run)
}

/// A failed call is reported as a failure even when a newer request has
/// superseded it.
fn analysis_response(run: AnalysisRun) -> Result<Json<AnalyzeResponse>, ApiError> {
    match run.completion {
        Completion::Applied | Completion::Stale { error: None } => Ok(Json(AnalyzeResponse {
            success: true,
            request_id: run.request_id,
            applied: run.outcome.is_some(),
            outcome: run.outcome,
        })),
        Completion::Failed(msg) | Completion::Stale { error: Some(msg) } => {
            Err(ApiError::AnalysisFailed(msg))
        }
    }
}
