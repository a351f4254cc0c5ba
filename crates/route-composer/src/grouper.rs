//! Route Grouping
//!
//! Folds top-level routes that visit the same token sequence into one
//! display unit, regardless of which pools each of them used.

use indexmap::IndexMap;

use crate::state::TopLevelRoute;

/// Top-level routes sharing one slug, in plan order.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteBucket<'a> {
    pub slug: String,
    /// First-seen position; fixes output order
    pub index: usize,
    pub members: Vec<&'a TopLevelRoute>,
}

/// Canonical token-sequence signature: every stage output, lower-cased and
/// hyphen-joined. `None` for zero-hop routes.
pub fn route_slug(route: &TopLevelRoute) -> Option<String> {
    if route.stages.is_empty() {
        return None;
    }
    let slug = route
        .stage_outputs()
        .map(|a| a.as_str().to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-");
    Some(slug)
}

/// Group routes by slug, preserving first-seen order.
pub fn group_routes(routes: &[TopLevelRoute]) -> Vec<RouteBucket<'_>> {
    let mut buckets: IndexMap<String, Vec<&TopLevelRoute>> = IndexMap::new();

    for route in routes {
        match route_slug(route) {
            Some(slug) => buckets.entry(slug).or_default().push(route),
            None => tracing::debug!("Skipping zero-hop route {}", route.index),
        }
    }

    buckets
        .into_iter()
        .enumerate()
        .map(|(index, (slug, members))| RouteBucket {
            slug,
            index,
            members,
        })
        .collect()
}
