//! Persistence of assessment results, behind a trait so handlers can be tested without Postgres.
//!
//! `AppState` holds an `Arc<dyn AssessmentStore>`.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::assessment::UserAssessmentRow;

#[async_trait]
pub trait AssessmentStore: Send + Sync {
    /// Stores the submitted ratings and the report returned for them.
    async fn save(
        &self,
        user_id: Option<Uuid>,
        skills: &Value,
        results: &Value,
    ) -> Result<UserAssessmentRow, AppError>;
}

pub struct PgAssessmentStore {
    pool: PgPool,
}

impl PgAssessmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssessmentStore for PgAssessmentStore {
    async fn save(
        &self,
        user_id: Option<Uuid>,
        skills: &Value,
        results: &Value,
    ) -> Result<UserAssessmentRow, AppError> {
        let row = sqlx::query_as::<_, UserAssessmentRow>(
            r#"
            INSERT INTO user_assessments (user_id, skills, results)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, skills, results, created_at
            "#,
        )
        .bind(user_id)
        .bind(skills)
        .bind(results)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}

/// Keeps rows in memory. Used by router tests.
#[cfg(test)]
#[derive(Default)]
pub struct InMemoryAssessmentStore {
    rows: std::sync::Mutex<Vec<UserAssessmentRow>>,
}

#[cfg(test)]
impl InMemoryAssessmentStore {
    pub fn rows(&self) -> Vec<UserAssessmentRow> {
        self.rows.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl AssessmentStore for InMemoryAssessmentStore {
    async fn save(
        &self,
        user_id: Option<Uuid>,
        skills: &Value,
        results: &Value,
    ) -> Result<UserAssessmentRow, AppError> {
        let row = UserAssessmentRow {
            id: Uuid::new_v4(),
            user_id,
            skills: skills.clone(),
            results: results.clone(),
            created_at: chrono::Utc::now(),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }
}
