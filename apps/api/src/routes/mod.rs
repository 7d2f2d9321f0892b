pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assessment::handlers as assessment;
use crate::jobs::handlers as jobs;
use crate::matching::handlers as matching;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::home_handler))
        .route("/health", get(health::health_handler))
        // Career prediction
        .route(
            "/api/v1/predict-career",
            post(matching::handle_predict_career)
                .fallback(matching::handle_predict_method_not_allowed),
        )
        .route("/api/v1/model", get(matching::handle_model_info))
        .route("/api/v1/model/reload", post(matching::handle_model_reload))
        // Skill assessment & learning
        .route("/api/v1/skills", get(assessment::handle_list_skills))
        .route(
            "/api/v1/assessment",
            post(assessment::handle_submit_assessment),
        )
        .route(
            "/api/v1/learning/recommend",
            post(assessment::handle_recommend_learning),
        )
        // Job listings
        .route("/api/v1/jobs", get(jobs::handle_list_jobs))
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job))
        .with_state(state)
}
