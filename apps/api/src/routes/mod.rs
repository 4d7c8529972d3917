pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::recommender::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/recommend", post(handlers::handle_recommend))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::llm_client::fake::ScriptedGateway;
    use crate::llm_client::LlmError;
    use crate::recommender::orchestrator::Recommender;

    fn app(gateway: ScriptedGateway) -> Router {
        build_router(AppState {
            recommender: Recommender::new(Arc::new(gateway)),
        })
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn recommend_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/recommend")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_engine_ready() {
        let response = app(ScriptedGateway::new())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["engine"], true);
    }

    #[tokio::test]
    async fn test_recommend_empty_query_is_bad_request() {
        let response = app(ScriptedGateway::new())
            .oneshot(recommend_request(json!({"query": ""})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_recommend_gateway_failure_is_service_unavailable() {
        let gateway = ScriptedGateway::new().with_object(Err(LlmError::RateLimited { retries: 3 }));
        let response = app(gateway)
            .oneshot(recommend_request(json!({"query": "cook in Goa"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "GATEWAY_ERROR");
    }

    #[tokio::test]
    async fn test_recommend_returns_snake_case_payload() {
        let gateway = ScriptedGateway::new()
            .with_object(Ok(json!({
                "skills": ["cooking"],
                "job_titles": ["Cook", "Chef", "Kitchen Helper"],
                "locations": ["Goa"],
                "experience_level": "mid-level"
            })))
            .with_array(Ok(json!([{
                "title": "Line Cook",
                "company": "Taj Hotels",
                "location": "Panaji, Goa",
                "description": "Cooking for banquet service",
                "url": "https://example.com/line-cook",
                "source": "Indeed"
            }])));

        let response = app(gateway)
            .oneshot(recommend_request(json!({"query": "cook in Goa"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["job_titles"][0], "Cook");
        assert_eq!(body["total_jobs_found"], 1);
        assert_eq!(body["best_matches"][0]["match_score"], json!(100.0));
        assert_eq!(body["best_matches"][0]["skills_matched"], json!(["cooking"]));
        assert_eq!(body["other_jobs"], json!([]));
    }
}
