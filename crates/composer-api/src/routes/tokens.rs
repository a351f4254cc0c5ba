//! Token list routes

use axum::{extract::State, routing::get, Json, Router};
use route_composer::TokenList;

use crate::dto::{TokenListRequest, TokenListResponse};
use crate::AppState;

/// Create token list routes
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_tokens).put(put_tokens))
}

/// GET /tokens - Get the registered token list
async fn get_tokens(State(state): State<AppState>) -> Json<TokenListResponse> {
    let tokens = state.tokens().await.entries();
    let count = tokens.len();
    Json(TokenListResponse { tokens, count })
}

/// PUT /tokens - Replace the registered token list
async fn put_tokens(
    State(state): State<AppState>,
    Json(request): Json<TokenListRequest>,
) -> Json<TokenListResponse> {
    state.set_tokens(TokenList::from(request.tokens)).await;
    get_tokens(State(state)).await
}
