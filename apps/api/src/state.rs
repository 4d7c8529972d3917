use crate::recommender::orchestrator::Recommender;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup around the LLM gateway; holds no per-request state.
    pub recommender: Recommender,
}
