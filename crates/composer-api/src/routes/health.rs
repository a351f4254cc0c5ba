//! Health check endpoint

use axum::{extract::State, Json};

use crate::dto::HealthResponse;
use crate::AppState;

/// GET /health - Check API health and report how many tokens are registered
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let tokens = state.tokens().await.len();
    Json(HealthResponse::new(tokens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use route_composer::{TokenList, TokenListEntry};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::create_app;

    #[tokio::test]
    async fn test_health_reports_token_count() {
        let state = AppState::new();
        state
            .set_tokens(TokenList::from(vec![TokenListEntry {
                address: "0xa0b8".into(),
                symbol: "USDC".to_string(),
                decimals: 6,
                logo: None,
            }]))
            .await;

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = create_app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["tokens"], 1);
    }
}
