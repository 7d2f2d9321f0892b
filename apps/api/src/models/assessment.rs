use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserAssessmentRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub skills: Value,
    pub results: Value,
    pub created_at: DateTime<Utc>,
}
