//! Route Composition Routes

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use route_composer::compose_route;

use crate::dto::{ApiError, ComposeRequest, ComposeResponse};
use crate::AppState;

/// Create composition routes
pub fn router() -> Router<AppState> {
    Router::new().route("/compose", post(compose))
}

/// POST /route/compose - Build the route composition for a quoted plan
///
/// A plan with nothing to render is a normal 200 with `available: false`.
async fn compose(
    State(state): State<AppState>,
    request: Result<Json<ComposeRequest>, JsonRejection>,
) -> Result<Json<ComposeResponse>, (StatusCode, Json<ApiError>)> {
    let Json(request) = request.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::bad_request(e.body_text())),
        )
    })?;

    let tokens = state.tokens().await;
    let graph = compose_route(&request.plan, &tokens, state.compose_config());

    Ok(Json(graph.into()))
}
