//! Data Transfer Objects for API requests and responses

use route_composer::{CompositionGraph, RawPlan, RouteGroup, TokenListEntry};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Number of registered tokens
    pub tokens: usize,
}

impl HealthResponse {
    pub fn new(tokens: usize) -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            tokens,
        }
    }
}

/// Generic API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("bad_request", message)
    }
}

/// Compose request: the plan exactly as the quoting backend returned it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeRequest {
    pub plan: RawPlan,
}

/// Per-route labels for the route panel header
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummaryDto {
    pub id: String,
    pub path_label: String,
    pub percentage_label: Option<String>,
    pub pool_count: usize,
}

impl From<&RouteGroup> for RouteSummaryDto {
    fn from(route: &RouteGroup) -> Self {
        Self {
            id: route.id.clone(),
            path_label: route.path_label(),
            percentage_label: route.percentage_label(),
            pool_count: route.sub_routes.iter().map(Vec::len).sum(),
        }
    }
}

/// Compose response. `available: false` means there is nothing to render.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeResponse {
    pub available: bool,
    pub composition: Option<CompositionGraph>,
    pub summaries: Vec<RouteSummaryDto>,
}

impl From<Option<CompositionGraph>> for ComposeResponse {
    fn from(graph: Option<CompositionGraph>) -> Self {
        let summaries = graph
            .as_ref()
            .map(|g| g.routes().iter().map(RouteSummaryDto::from).collect())
            .unwrap_or_default();
        Self {
            available: graph.is_some(),
            composition: graph,
            summaries,
        }
    }
}

/// Registered token list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenListResponse {
    pub tokens: Vec<TokenListEntry>,
    pub count: usize,
}

/// Replace the registered token list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenListRequest {
    pub tokens: Vec<TokenListEntry>,
}
