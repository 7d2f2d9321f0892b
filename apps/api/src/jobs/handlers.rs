use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::query::{build_list_query, JobQuery};
use crate::models::job::JobRow;
use crate::state::AppState;

/// GET /api/v1/jobs
///
/// Filters: job_type, location, company (exact); search (substring over title,
/// description, company, location); ordering (posted_date | created_at | title, `-` for
/// descending, default `-created_at`); limit / offset.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobQuery>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    let mut builder = build_list_query(&params)?;
    let jobs = builder
        .build_query_as::<JobRow>()
        .fetch_all(&state.db)
        .await?;
    Ok(Json(jobs))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    let job = sqlx::query_as::<_, JobRow>(
        "SELECT id, title, company, location, job_type, description, url, posted_date, created_at \
         FROM jobs WHERE id = $1",
    )
    .bind(job_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    Ok(Json(job))
}
