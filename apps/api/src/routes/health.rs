use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "career-api"
    }))
}

/// GET /
pub async fn home_handler() -> &'static str {
    "Welcome to the E-Career Guidance System!"
}
