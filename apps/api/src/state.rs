use std::sync::Arc;

use sqlx::PgPool;

use crate::assessment::store::AssessmentStore;
use crate::matching::artifacts::ArtifactStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Model bundle currently serving predictions; swapped on reload.
    pub artifacts: Arc<ArtifactStore>,
    /// Pluggable assessment persistence. Default: PgAssessmentStore.
    pub assessments: Arc<dyn AssessmentStore>,
}
