//! Raw Plan Normalization
//!
//! Converts the quoting backend's semi-structured route list into typed
//! [`TopLevelRoute`]s. Every field is optional on the wire and route entries
//! are decoded one at a time, so a hop that is missing a field, or carries
//! one of the wrong type, invalidates only its own route.

use std::collections::BTreeMap;

use composer_core::{Address, Amount, PoolId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::resolver::{resolve_or_placeholder, TokenResolver};
use crate::state::{ComposeError, Hop, TokenDescriptor, TopLevelRoute};

/// Execution plan as returned by the quoting backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlan {
    pub token_in: Option<String>,
    pub amount_in: Option<Value>,
    pub token_out: Option<String>,
    /// Route entries, each expected to be a list of hops. Kept untyped so
    /// one bad entry cannot reject the whole plan.
    pub route: Option<Vec<Value>>,
}

/// One hop of a raw route entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHop {
    pub pool: Option<String>,
    pub token_in: Option<String>,
    pub token_out: Option<String>,
    pub swap_amount: Option<Value>,
    pub amount_out: Option<Value>,
    pub exchange: Option<String>,
}

/// Typed plan ready for grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPlan {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: Amount,
    /// Well-formed routes in plan order (zero-hop entries included)
    pub routes: Vec<TopLevelRoute>,
    /// Every token seen, resolved once
    pub tokens: BTreeMap<Address, TokenDescriptor>,
    /// Number of malformed entries dropped
    pub skipped: usize,
}

impl NormalizedPlan {
    /// Descriptor for `address`, or a placeholder if it was never resolved.
    pub fn descriptor(&self, address: &Address, placeholder_symbol: &str) -> TokenDescriptor {
        self.tokens
            .get(address)
            .cloned()
            .unwrap_or_else(|| crate::resolver::placeholder(address, placeholder_symbol))
    }
}

/// Parse a decimal string or JSON integer into an [`Amount`].
///
/// JSON numbers are only exact up to `u64::MAX`; anything larger has
/// already been rounded to a float by the JSON parser and is rejected.
/// Larger amounts must arrive as decimal strings.
pub fn parse_amount(value: &Value) -> Option<Amount> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64().map(Amount::from),
        _ => None,
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Normalize a raw plan, resolving every token it mentions.
///
/// Plan-level absence is an error (`is_absent()`); malformed routes are
/// skipped and counted.
pub fn normalize_plan<R: TokenResolver + ?Sized>(
    plan: &RawPlan,
    resolver: &R,
    placeholder_symbol: &str,
) -> Result<NormalizedPlan, ComposeError> {
    let token_in = non_empty(&plan.token_in)
        .map(Address::new)
        .ok_or(ComposeError::MissingBoundary("tokenIn"))?;
    let token_out = non_empty(&plan.token_out)
        .map(Address::new)
        .ok_or(ComposeError::MissingBoundary("tokenOut"))?;

    let amount_in = match plan.amount_in.as_ref() {
        None | Some(Value::Null) => return Err(ComposeError::MissingBoundary("amountIn")),
        Some(v) => parse_amount(v).ok_or_else(|| ComposeError::InvalidAmountIn(v.to_string()))?,
    };
    if amount_in.is_zero() {
        return Err(ComposeError::InvalidAmountIn("0".to_string()));
    }

    let raw_routes = match plan.route.as_deref() {
        Some(routes) if !routes.is_empty() => routes,
        _ => return Err(ComposeError::NoRoutes),
    };

    let mut routes = Vec::with_capacity(raw_routes.len());
    let mut skipped = 0;
    for (index, raw_route) in raw_routes.iter().enumerate() {
        match decode_route(index, raw_route).and_then(|hops| normalize_route(index, &hops)) {
            Ok(route) => routes.push(route),
            Err(e) if e.is_route_local() => {
                tracing::warn!("Skipping route {} of plan: {}", index, e);
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    let mut tokens = BTreeMap::new();
    let mentioned = routes
        .iter()
        .flat_map(|r| r.stages.iter().flatten())
        .flat_map(|h| [&h.token_in, &h.token_out])
        .chain([&token_in, &token_out]);
    for address in mentioned {
        if !tokens.contains_key(address) {
            let desc = resolve_or_placeholder(resolver, address, placeholder_symbol);
            tokens.insert(address.clone(), desc);
        }
    }

    Ok(NormalizedPlan {
        token_in,
        token_out,
        amount_in,
        routes,
        tokens,
        skipped,
    })
}

/// Decode one untyped route entry into its raw hops.
pub fn decode_route(index: usize, entry: &Value) -> Result<Vec<RawHop>, ComposeError> {
    let items = entry.as_array().ok_or_else(|| ComposeError::MalformedRoute {
        route: index,
        reason: format!("expected a list of hops, got {}", json_kind(entry)),
    })?;

    items
        .iter()
        .enumerate()
        .map(|(hop, item)| {
            RawHop::deserialize(item).map_err(|e| ComposeError::MalformedHop {
                route: index,
                hop,
                reason: e.to_string(),
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Normalize one raw route entry into a top-level route, one hop per stage.
pub fn normalize_route(index: usize, raw: &[RawHop]) -> Result<TopLevelRoute, ComposeError> {
    let hops = raw
        .iter()
        .enumerate()
        .map(|(hop, raw_hop)| normalize_hop(index, hop, raw_hop))
        .collect::<Result<Vec<_>, _>>()?;

    for (stage, pair) in hops.windows(2).enumerate() {
        if pair[0].token_out != pair[1].token_in {
            return Err(ComposeError::BrokenContinuity {
                route: index,
                stage: stage + 1,
            });
        }
    }

    Ok(TopLevelRoute {
        index,
        stages: hops.into_iter().map(|h| vec![h]).collect(),
    })
}

fn normalize_hop(route: usize, hop: usize, raw: &RawHop) -> Result<Hop, ComposeError> {
    let malformed = |reason: &str| ComposeError::MalformedHop {
        route,
        hop,
        reason: reason.to_string(),
    };

    let pool_id = non_empty(&raw.pool)
        .map(PoolId::new)
        .ok_or_else(|| malformed("missing pool"))?;
    let token_in = non_empty(&raw.token_in)
        .map(Address::new)
        .ok_or_else(|| malformed("missing tokenIn"))?;
    let token_out = non_empty(&raw.token_out)
        .map(Address::new)
        .ok_or_else(|| malformed("missing tokenOut"))?;

    let input_amount = raw
        .swap_amount
        .as_ref()
        .ok_or_else(|| malformed("missing swapAmount"))
        .and_then(|v| parse_amount(v).ok_or_else(|| malformed("non-numeric swapAmount")))?;
    if input_amount.is_zero() {
        return Err(malformed("zero swapAmount"));
    }

    // amountOut is informational; absent or unparsable output counts as zero.
    let output_amount = raw
        .amount_out
        .as_ref()
        .and_then(parse_amount)
        .unwrap_or_default();

    Ok(Hop {
        pool_id,
        exchange_id: raw.exchange.clone().unwrap_or_default(),
        token_in,
        token_out,
        input_amount,
        output_amount,
    })
}
