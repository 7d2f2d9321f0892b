mod assessment;
mod config;
mod db;
mod errors;
mod jobs;
mod matching;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assessment::store::PgAssessmentStore;
use crate::config::Config;
use crate::db::create_pool;
use crate::matching::artifacts::{ArtifactPaths, ArtifactStore};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Load model artifacts once; reloads go through POST /api/v1/model/reload
    let paths = ArtifactPaths::new(&config.model_dir, &config.career_dataset_path);
    let artifacts = tokio::task::spawn_blocking(move || ArtifactStore::open(paths)).await??;
    let summary = artifacts.current().summary();
    info!(
        "Model ready: {} classes, {} features, {} catalogue careers",
        summary.classes, summary.features, summary.catalog_careers
    );

    // Build app state
    let state = AppState {
        db: db.clone(),
        artifacts: Arc::new(artifacts),
        assessments: Arc::new(PgAssessmentStore::new(db)),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
