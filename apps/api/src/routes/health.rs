use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// The recommender is constructed before the listener binds, so a serving
/// process always reports the engine as ready.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "engine": true,
        "version": env!("CARGO_PKG_VERSION"),
        "service": "jobscout"
    }))
}
