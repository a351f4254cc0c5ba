//! Route Composition Engine
//!
//! Turns the raw multi-path, multi-hop execution plan returned by a quoting
//! backend into a deduplicated, percentage-annotated graph describing how
//! the input amount is split and routed across liquidity venues.

pub mod composer;
pub mod grouper;
pub mod merger;
pub mod normalize;
pub mod percentage;
pub mod resolver;
pub mod state;

// Re-exports
pub use composer::{compose_route, try_compose_route};
pub use grouper::{group_routes, route_slug, RouteBucket};
pub use merger::{merge_group, pool_fill_id, MergedGroup};
pub use normalize::{
    decode_route, normalize_plan, normalize_route, parse_amount, NormalizedPlan, RawHop, RawPlan,
};
pub use percentage::{
    format_percentage, is_below_display_threshold, normalize_route_percentages,
    pool_share_percentage, route_share_percentage,
};
pub use resolver::{placeholder, resolve_or_placeholder, TokenList, TokenListEntry, TokenResolver};
pub use state::{
    ComposeError, CompositionGraph, Hop, HopStage, PoolFill, RouteGroup, TokenDescriptor,
    TokenInfo, TopLevelRoute,
};
