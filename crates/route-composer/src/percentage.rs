//! Percentage Calculator
//!
//! Share math for pool fills and display routes. Amounts stay exact; only
//! the derived percentages go through floating point.

use composer_core::{Amount, ComposeConfig};

use crate::state::RouteGroup;

/// Whole-percent share of `amount` in `total`.
///
/// Sibling values are not forced to sum to 100.
pub fn pool_share_percentage(amount: &Amount, total: &Amount) -> f64 {
    raw_percentage(amount, total).round()
}

/// Unrounded share of `amount` in the boundary input `amount_in`.
pub fn route_share_percentage(amount: &Amount, amount_in: &Amount) -> f64 {
    raw_percentage(amount, amount_in)
}

fn raw_percentage(part: &Amount, total: &Amount) -> f64 {
    if total.is_zero() {
        return 0.0;
    }
    part.to_f64() * 100.0 / total.to_f64()
}

/// Finalize display percentages in place.
///
/// A lone route is always shown at exactly 100. With several routes each
/// raw value is clamped to the configured display bounds; the raw value is
/// left untouched for threshold rendering.
pub fn normalize_route_percentages(routes: &mut [RouteGroup], config: &ComposeConfig) {
    if let [only] = &mut *routes {
        only.swap_percentage = Some(100.0);
        return;
    }

    for route in routes.iter_mut() {
        route.swap_percentage = route.raw_swap_percentage.map(|raw| {
            raw.max(config.min_display_percentage)
                .min(config.max_display_percentage)
        });
    }
}

/// True when `raw` rounds to zero at two decimals.
pub fn is_below_display_threshold(raw: f64) -> bool {
    (raw * 100.0).round() <= 0.0
}

/// Render a percentage with at most two decimals, e.g. `"70%"`, `"33.33%"`.
/// Values that round to zero render as `"<0.01%"`.
pub fn format_percentage(raw: f64) -> String {
    if is_below_display_threshold(raw) {
        return "<0.01%".to_string();
    }
    let rounded = (raw * 100.0).round() / 100.0;
    let text = format!("{:.2}", rounded);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{}%", text)
}
