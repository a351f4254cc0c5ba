//! Route Composition State Types
//!
//! Data structures for hops, top-level routes, display routes and pool fills.

use composer_core::{constants::PATH_SEPARATOR, Address, Amount, PoolId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::percentage::{format_percentage, is_below_display_threshold};

/// Token metadata returned by a [`crate::TokenResolver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// Resolved token shown along a route path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDescriptor {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// One directional exchange of `token_in` for `token_out` at one pool.
///
/// Built only by the normalizer, which guarantees `input_amount > 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    pub pool_id: PoolId,
    pub exchange_id: String,
    pub token_in: Address,
    pub token_out: Address,
    pub input_amount: Amount,
    pub output_amount: Amount,
}

/// Hops executed in parallel at one position of a path.
pub type HopStage = Vec<Hop>;

/// One complete parallel path returned by the quoting backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopLevelRoute {
    /// Position of the entry in the raw plan
    pub index: usize,
    pub stages: Vec<HopStage>,
}

impl TopLevelRoute {
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Token the route starts from, if it has any hops.
    pub fn start_token(&self) -> Option<&Address> {
        self.stages.first()?.first().map(|h| &h.token_in)
    }

    /// Token produced by each stage, in order.
    pub fn stage_outputs(&self) -> impl Iterator<Item = &Address> + '_ {
        self.stages
            .iter()
            .filter_map(|stage| stage.first().map(|h| &h.token_out))
    }

    /// Total amount entering the first stage.
    pub fn first_stage_amount(&self) -> Amount {
        self.stages
            .first()
            .map(|stage| stage.iter().map(|h| &h.input_amount).sum::<Amount>())
            .unwrap_or_default()
    }
}

/// One pool's share of one stage's volume within a display route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolFill {
    /// Bare pool id for single-stage routes, `pool-tokenIn-tokenOut` otherwise
    pub id: String,
    pub pool_id: PoolId,
    pub exchange: String,
    pub token_in: Address,
    pub token_out: Address,
    /// Accumulated input across all contributing top-level routes
    pub swap_amount: Amount,
    /// Accumulated output across all contributing top-level routes
    pub amount_out: Amount,
    /// Whole-percent share of the stage total
    pub swap_percentage: f64,
    /// Stage total the percentage was computed against
    pub total: Amount,
}

/// A deduplicated display route: every top-level route sharing one token
/// sequence, folded together.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteGroup {
    /// Canonical token-sequence slug
    pub id: String,
    /// First-seen order among the plan's routes
    pub index: usize,
    /// Display percentage (forced or clamped)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap_percentage: Option<f64>,
    /// Unclamped share of the boundary input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_swap_percentage: Option<f64>,
    pub path: Vec<TokenDescriptor>,
    pub sub_routes: Vec<Vec<PoolFill>>,
}

impl RouteGroup {
    /// Path as a single label, e.g. `"USDC → WETH → DAI"`.
    pub fn path_label(&self) -> String {
        self.path
            .iter()
            .map(|t| t.symbol.as_str())
            .collect::<Vec<_>>()
            .join(PATH_SEPARATOR)
    }

    /// Percentage text for the route header.
    ///
    /// Shares too small to show at two decimals render as `"<0.01%"`.
    pub fn percentage_label(&self) -> Option<String> {
        let shown = self.swap_percentage?;
        match self.raw_swap_percentage {
            Some(raw) if shown < 100.0 && is_below_display_threshold(raw) => {
                Some("<0.01%".to_string())
            }
            _ => Some(format_percentage(shown)),
        }
    }
}

/// Frozen output of one composition run.
///
/// Every quote refresh produces a new graph; there are no mutators.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionGraph {
    token_in: TokenDescriptor,
    token_out: TokenDescriptor,
    amount_in: Amount,
    amount_out: Amount,
    routes: Vec<RouteGroup>,
}

impl CompositionGraph {
    pub(crate) fn new(
        token_in: TokenDescriptor,
        token_out: TokenDescriptor,
        amount_in: Amount,
        amount_out: Amount,
        routes: Vec<RouteGroup>,
    ) -> Self {
        Self {
            token_in,
            token_out,
            amount_in,
            amount_out,
            routes,
        }
    }

    pub fn token_in(&self) -> &TokenDescriptor {
        &self.token_in
    }

    pub fn token_out(&self) -> &TokenDescriptor {
        &self.token_out
    }

    pub fn amount_in(&self) -> &Amount {
        &self.amount_in
    }

    /// Sum of final-stage outputs of routes ending in the boundary output token.
    pub fn amount_out(&self) -> &Amount {
        &self.amount_out
    }

    pub fn routes(&self) -> &[RouteGroup] {
        &self.routes
    }

    pub fn is_single_route(&self) -> bool {
        self.routes.len() == 1
    }

    /// Number of distinct pool fills across all routes.
    pub fn pool_count(&self) -> usize {
        let mut ids: Vec<&str> = self
            .routes
            .iter()
            .flat_map(|r| r.sub_routes.iter().flatten())
            .map(|f| f.id.as_str())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    /// Distinct exchange ids in first-seen order.
    pub fn exchanges(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for fill in self.routes.iter().flat_map(|r| r.sub_routes.iter().flatten()) {
            if !seen.contains(&fill.exchange.as_str()) {
                seen.push(fill.exchange.as_str());
            }
        }
        seen
    }
}

/// Route composition errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    #[error("Plan contains no routes")]
    NoRoutes,

    #[error("Plan is missing boundary field {0}")]
    MissingBoundary(&'static str),

    #[error("Invalid boundary input amount: {0}")]
    InvalidAmountIn(String),

    #[error("Route {route} is malformed: {reason}")]
    MalformedRoute { route: usize, reason: String },

    #[error("Route {route} hop {hop} is malformed: {reason}")]
    MalformedHop {
        route: usize,
        hop: usize,
        reason: String,
    },

    #[error("Route {route} breaks token continuity at stage {stage}")]
    BrokenContinuity { route: usize, stage: usize },

    #[error("Route group {slug} expected {expected} stages, found {found}")]
    StageCountMismatch {
        slug: String,
        expected: usize,
        found: usize,
    },

    #[error("Route group {slug} has an empty stage {stage}")]
    EmptyStage { slug: String, stage: usize },

    #[error("Route group {slug} has zero volume at stage {stage}")]
    ZeroStageTotal { slug: String, stage: usize },
}

impl ComposeError {
    /// True for expected "nothing to render" states, as opposed to faults.
    pub fn is_absent(&self) -> bool {
        matches!(
            self,
            Self::NoRoutes | Self::MissingBoundary(_) | Self::InvalidAmountIn(_)
        )
    }

    /// True for errors confined to a single top-level route.
    pub fn is_route_local(&self) -> bool {
        matches!(
            self,
            Self::MalformedRoute { .. } | Self::MalformedHop { .. } | Self::BrokenContinuity { .. }
        )
    }
}
