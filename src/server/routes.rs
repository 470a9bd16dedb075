use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use log::debug;

use crate::analysis::{AnalysisError, AnalysisResponse, GenerateRequest};
use crate::server::AppState;

pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, AnalysisError> {
    let Json(body) = payload.map_err(|e| AnalysisError::Validation(e.body_text()))?;
    let request = body.validate()?;
    debug!(
        "Generate request for {} (feedback: {})",
        request.company_name,
        !request.feedback.is_empty()
    );

    let response = state.service.analyze(&request).await?;
    Ok(Json(response))
}

/// Empty success for `OPTIONS /generate`. The CORS layer usually answers first.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
