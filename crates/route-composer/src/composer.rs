//! Route Composition
//!
//! Runs normalize, group, merge and percentage finalization over one raw
//! plan and assembles the frozen [`CompositionGraph`]. Pure and stateless:
//! each call is independent and identical input yields an equal graph.

use composer_core::{Amount, ComposeConfig};

use crate::grouper::group_routes;
use crate::merger::{merge_group, MergedGroup};
use crate::normalize::{normalize_plan, NormalizedPlan, RawPlan};
use crate::percentage::normalize_route_percentages;
use crate::resolver::TokenResolver;
use crate::state::{ComposeError, CompositionGraph, RouteGroup};

/// Compose a plan, returning `None` when there is nothing to render.
///
/// Never propagates a failure: absence is logged at debug, faults during
/// the fold at error.
pub fn compose_route<R: TokenResolver + ?Sized>(
    plan: &RawPlan,
    resolver: &R,
    config: &ComposeConfig,
) -> Option<CompositionGraph> {
    match try_compose_route(plan, resolver, config) {
        Ok(graph) => Some(graph),
        Err(e) if e.is_absent() => {
            tracing::debug!("No composition available: {}", e);
            None
        }
        Err(e) => {
            tracing::error!("Route composition aborted: {}", e);
            None
        }
    }
}

/// Compose a plan, surfacing why no graph was produced.
pub fn try_compose_route<R: TokenResolver + ?Sized>(
    plan: &RawPlan,
    resolver: &R,
    config: &ComposeConfig,
) -> Result<CompositionGraph, ComposeError> {
    let normalized = normalize_plan(plan, resolver, &config.placeholder_symbol)?;

    let buckets = group_routes(&normalized.routes);
    if buckets.is_empty() {
        return Err(ComposeError::NoRoutes);
    }

    let merged = buckets
        .iter()
        .map(|bucket| merge_group(bucket, &normalized.token_in, &normalized.amount_in))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(assemble(&normalized, merged, config))
}

/// Attach boundary context, resolve paths, finalize percentages.
fn assemble(
    plan: &NormalizedPlan,
    mut merged: Vec<MergedGroup>,
    config: &ComposeConfig,
) -> CompositionGraph {
    merged.sort_by_key(|g| g.index);

    let mut amount_out = Amount::zero();
    let mut routes: Vec<RouteGroup> = Vec::with_capacity(merged.len());
    for group in merged {
        if group.path.last() == Some(&plan.token_out) {
            if let Some(last_stage) = group.sub_routes.last() {
                for fill in last_stage {
                    amount_out += &fill.amount_out;
                }
            }
        }

        routes.push(RouteGroup {
            id: group.slug,
            index: group.index,
            swap_percentage: None,
            raw_swap_percentage: group.raw_swap_percentage,
            path: group
                .path
                .iter()
                .map(|a| plan.descriptor(a, &config.placeholder_symbol))
                .collect(),
            sub_routes: group.sub_routes,
        });
    }

    normalize_route_percentages(&mut routes, config);

    CompositionGraph::new(
        plan.descriptor(&plan.token_in, &config.placeholder_symbol),
        plan.descriptor(&plan.token_out, &config.placeholder_symbol),
        plan.amount_in.clone(),
        amount_out,
        routes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::RawHop;
    use crate::resolver::TokenList;
    use crate::state::TokenInfo;
    use composer_core::Address;
    use serde_json::{json, Value};

    fn make_hop(pool: &str, token_in: &str, token_out: &str, amount: u64) -> RawHop {
        RawHop {
            pool: Some(pool.to_string()),
            token_in: Some(token_in.to_string()),
            token_out: Some(token_out.to_string()),
            swap_amount: Some(Value::String(amount.to_string())),
            amount_out: Some(Value::String((amount * 9 / 10).to_string())),
            exchange: Some("kyberswap-elastic".to_string()),
        }
    }

    fn make_plan(amount_in: u64, routes: Vec<Vec<RawHop>>) -> RawPlan {
        RawPlan {
            token_in: Some("A".to_string()),
            amount_in: Some(json!(amount_in.to_string())),
            token_out: Some("C".to_string()),
            route: Some(routes.into_iter().map(|r| json!(r)).collect()),
        }
    }

    fn token_list() -> TokenList {
        let mut list = TokenList::new();
        for (addr, sym) in [("a", "AAA"), ("b", "BBB"), ("c", "CCC")] {
            list.insert(
                addr,
                TokenInfo {
                    symbol: sym.to_string(),
                    decimals: 18,
                    logo: None,
                },
            );
        }
        list
    }

    fn compose(plan: &RawPlan) -> Option<CompositionGraph> {
        compose_route(plan, &token_list(), &ComposeConfig::default())
    }

    #[test]
    fn test_worked_example() {
        let plan = make_plan(
            100,
            vec![
                vec![make_hop("P1", "A", "B", 70), make_hop("P3", "B", "C", 70)],
                vec![make_hop("P2", "A", "B", 30), make_hop("P3", "B", "C", 30)],
            ],
        );
        let graph = compose(&plan).unwrap();
        assert!(graph.is_single_route());

        let route = &graph.routes()[0];
        assert_eq!(route.id, "b-c");
        assert_eq!(route.swap_percentage, Some(100.0));
        assert_eq!(route.path_label(), "AAA \u{2192} BBB \u{2192} CCC");

        let stage0: Vec<(&str, f64)> = route.sub_routes[0]
            .iter()
            .map(|f| (f.id.as_str(), f.swap_percentage))
            .collect();
        assert_eq!(stage0, vec![("p1-a-b", 70.0), ("p2-a-b", 30.0)]);

        assert_eq!(route.sub_routes[1].len(), 1);
        assert_eq!(route.sub_routes[1][0].id, "p3-b-c");
        assert_eq!(route.sub_routes[1][0].swap_percentage, 100.0);
        assert_eq!(route.sub_routes[1][0].swap_amount, Amount::from(100));

        assert_eq!(graph.amount_in(), &Amount::from(100));
        assert_eq!(graph.amount_out(), &Amount::from(90));
        assert_eq!(graph.pool_count(), 3);
    }

    #[test]
    fn test_single_route_invariant() {
        let plan = make_plan(1000, vec![vec![make_hop("P1", "A", "C", 990)]]);
        let graph = compose(&plan).unwrap();
        assert_eq!(graph.routes().len(), 1);
        assert_eq!(graph.routes()[0].swap_percentage, Some(100.0));
        assert_eq!(graph.routes()[0].raw_swap_percentage, Some(99.0));
        assert_eq!(graph.routes()[0].sub_routes[0][0].id, "p1");
    }

    #[test]
    fn test_multiple_groups_ordered_and_clamped() {
        let plan = make_plan(
            1_000_000,
            vec![
                vec![make_hop("P1", "A", "C", 999_999)],
                vec![make_hop("P2", "A", "B", 1), make_hop("P3", "B", "C", 1)],
            ],
        );
        let graph = compose(&plan).unwrap();
        let ids: Vec<&str> = graph.routes().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b-c"]);

        let direct = &graph.routes()[0];
        assert_eq!(direct.swap_percentage, Some(99.99));
        assert_eq!(direct.percentage_label().as_deref(), Some("99.99%"));

        let tiny = &graph.routes()[1];
        assert_eq!(tiny.swap_percentage, Some(0.01));
        assert_eq!(tiny.raw_swap_percentage, Some(0.0001));
        assert_eq!(tiny.percentage_label().as_deref(), Some("<0.01%"));
    }

    #[test]
    fn test_idempotent() {
        let plan = make_plan(
            100,
            vec![
                vec![make_hop("P1", "A", "B", 50), make_hop("P3", "B", "C", 50)],
                vec![make_hop("P2", "A", "C", 25)],
                vec![make_hop("P4", "A", "B", 25), make_hop("P3", "B", "C", 25)],
            ],
        );
        let first = compose(&plan).unwrap();
        let second = compose(&plan).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_absent_plan_yields_none() {
        assert!(compose(&RawPlan::default()).is_none());
        assert!(compose(&make_plan(100, Vec::new())).is_none());
        assert!(compose(&make_plan(0, vec![vec![make_hop("P1", "A", "C", 1)]])).is_none());
    }

    #[test]
    fn test_all_routes_malformed_yields_none() {
        let mut hop = make_hop("P1", "A", "C", 10);
        hop.swap_amount = Some(json!("ten"));
        let err = try_compose_route(
            &make_plan(10, vec![vec![hop], Vec::new()]),
            &token_list(),
            &ComposeConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, ComposeError::NoRoutes);
    }

    #[test]
    fn test_partial_malformed_still_composes() {
        let mut broken = make_hop("P2", "A", "C", 30);
        broken.pool = None;
        let plan = make_plan(
            100,
            vec![vec![make_hop("P1", "A", "C", 70)], vec![broken]],
        );
        let graph = compose(&plan).unwrap();
        assert_eq!(graph.routes().len(), 1);
        assert_eq!(graph.routes()[0].sub_routes[0].len(), 1);
        assert_eq!(graph.routes()[0].raw_swap_percentage, Some(70.0));
    }

    #[test]
    fn test_null_and_mistyped_routes_still_compose() {
        let mut plan = make_plan(100, vec![vec![make_hop("P1", "A", "C", 70)]]);
        if let Some(routes) = plan.route.as_mut() {
            routes.push(Value::Null);
            routes.push(json!([{"pool": 42, "tokenIn": "A", "tokenOut": "C", "swapAmount": "30"}]));
        }
        let graph = compose(&plan).unwrap();
        assert_eq!(graph.routes().len(), 1);
        assert_eq!(graph.routes()[0].raw_swap_percentage, Some(70.0));
        assert_eq!(graph.routes()[0].swap_percentage, Some(100.0));
    }

    #[test]
    fn test_unknown_tokens_get_placeholders() {
        let plan = RawPlan {
            token_in: Some("0xUNKNOWN".to_string()),
            amount_in: Some(json!(5)),
            token_out: Some("C".to_string()),
            route: Some(vec![json!([make_hop("P1", "0xUNKNOWN", "C", 5)])]),
        };
        let graph = compose(&plan).unwrap();
        assert_eq!(graph.token_in().symbol, "--");
        assert_eq!(graph.token_in().address, Address::new("0xunknown"));
        assert_eq!(graph.routes()[0].path[0].symbol, "--");
        assert_eq!(graph.routes()[0].path[1].symbol, "CCC");
    }

    #[test]
    fn test_continuation_fragment_group() {
        let plan = make_plan(
            100,
            vec![
                vec![make_hop("P1", "A", "B", 100)],
                vec![make_hop("P2", "B", "C", 40)],
                vec![make_hop("P3", "A", "C", 10)],
            ],
        );
        let graph = compose(&plan).unwrap();
        let by_id = |id: &str| graph.routes().iter().find(|r| r.id == id).unwrap();

        // "c" holds the fragment and a real route; only the latter counts.
        assert_eq!(by_id("c").sub_routes[0].len(), 2);
        assert_eq!(by_id("c").raw_swap_percentage, Some(10.0));
        assert_eq!(by_id("b").raw_swap_percentage, Some(100.0));
        assert_eq!(by_id("b").swap_percentage, Some(99.99));
    }

    #[test]
    fn test_serialized_shape() {
        let plan = make_plan(100, vec![vec![make_hop("P1", "A", "C", 100)]]);
        let graph = compose(&plan).unwrap();
        let value = serde_json::to_value(&graph).unwrap();

        let route = &value["routes"][0];
        assert_eq!(route["id"], "c");
        assert_eq!(route["swapPercentage"], 100.0);
        assert_eq!(route["path"][0]["symbol"], "AAA");
        let fill = &route["subRoutes"][0][0];
        assert_eq!(fill["id"], "p1");
        assert_eq!(fill["exchange"], "kyberswap-elastic");
        assert_eq!(fill["swapAmount"], "100");
        assert_eq!(fill["swapPercentage"], 100.0);
        assert_eq!(fill["total"], "100");
        assert_eq!(value["amountIn"], "100");
    }

    #[test]
    fn test_exchanges_first_seen() {
        let mut curve = make_hop("P2", "A", "C", 50);
        curve.exchange = Some("curve".to_string());
        let plan = make_plan(
            100,
            vec![vec![make_hop("P1", "A", "C", 50)], vec![curve]],
        );
        let graph = compose(&plan).unwrap();
        assert_eq!(graph.exchanges(), vec!["kyberswap-elastic", "curve"]);
    }
}
