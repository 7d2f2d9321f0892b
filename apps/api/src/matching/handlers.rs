//! Axum route handlers for career prediction and model management.

use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::errors::{parse_json_body, AppError};
use crate::matching::artifacts::{BundleSummary, ReloadOutcome};
use crate::matching::explain::CareerPrediction;
use crate::matching::features::UserInput;
use crate::matching::pipeline::predict_careers;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub recommendations: Vec<CareerPrediction>,
}

/// POST /api/v1/predict-career
///
/// Top three careers for the submitted profile, explained and enriched.
/// The body is read as JSON even without a JSON content type.
pub async fn handle_predict_career(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictionResponse>, AppError> {
    let input: UserInput = parse_json_body(&body)?;

    let bundle = state.artifacts.current();
    let recommendations = predict_careers(&bundle, &input)?;

    info!(
        skills = input.skills.len(),
        interests = input.interests.len(),
        top = recommendations.first().map(|r| r.title.as_str()).unwrap_or("-"),
        "Career prediction served"
    );

    Ok(Json(PredictionResponse { recommendations }))
}

/// Any method other than POST on the prediction route.
pub async fn handle_predict_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed("POST")
}

/// GET /api/v1/model
pub async fn handle_model_info(State(state): State<AppState>) -> Json<BundleSummary> {
    Json(state.artifacts.current().summary())
}

/// POST /api/v1/model/reload
///
/// Rebuilds the bundle only if the artifact files changed on disk.
pub async fn handle_model_reload(
    State(state): State<AppState>,
) -> Result<Json<ReloadOutcome>, AppError> {
    Ok(Json(state.artifacts.reload().await?))
}
