use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assessment::learning::{recommend_resources, LearningResource};
use crate::assessment::scoring::{assess, AssessmentReport, CatalogSkill, SkillRating, SKILL_CATALOG};
use crate::errors::{parse_json_body, AppError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssessmentRequest {
    #[serde(default)]
    pub skills: Vec<SkillRating>,
}

#[derive(Debug, Deserialize)]
pub struct LearningRequest {
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub skills_to_improve: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LearningResponse {
    pub resources: Vec<LearningResource>,
}

/// POST /api/v1/assessment
pub async fn handle_submit_assessment(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AssessmentReport>, AppError> {
    let request: AssessmentRequest = parse_json_body(&body)?;
    if request.skills.is_empty() {
        return Err(AppError::Validation(
            "Invalid or missing 'skills' list.".to_string(),
        ));
    }

    let report = assess(&request.skills);

    let skills = serde_json::to_value(&request.skills).map_err(anyhow::Error::from)?;
    let results = serde_json::to_value(&report).map_err(anyhow::Error::from)?;
    let row = state.assessments.save(None, &skills, &results).await?;
    info!(
        assessment_id = %row.id,
        strong = report.strong_skills.len(),
        missing = report.missing_skills.len(),
        "Assessment stored"
    );

    Ok(Json(report))
}

/// POST /api/v1/learning/recommend
pub async fn handle_recommend_learning(body: Bytes) -> Result<Json<LearningResponse>, AppError> {
    let request: LearningRequest = parse_json_body(&body)?;
    Ok(Json(LearningResponse {
        resources: recommend_resources(&request.missing_skills, &request.skills_to_improve),
    }))
}

/// GET /api/v1/skills
pub async fn handle_list_skills() -> Json<&'static [CatalogSkill]> {
    Json(SKILL_CATALOG)
}
