//! Axum route handlers for the Recommendation API.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::recommender::models::RecommendationResult;
use crate::state::AppState;

const LOGGED_QUERY_CHARS: usize = 100;

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub query: String,
}

/// POST /recommend
///
/// Receives `{"query": "..."}` and returns skills, synthetic jobs and match scores.
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendationResult>, AppError> {
    if request.query.trim().is_empty() {
        return Err(AppError::Validation("Query is required".to_string()));
    }
    let query = request.query.as_str();

    info!(
        "Processing query: {}...",
        query.chars().take(LOGGED_QUERY_CHARS).collect::<String>()
    );

    let result = state.recommender.recommend(query).await?;

    info!(
        "Found {} jobs with {} skills",
        result.total_jobs_found,
        result.profile.skills.len()
    );

    Ok(Json(result))
}
