//! Severity bucketing and bounded rendering of route statuses.
//!
//! `health_percentage` reproduces the summary arithmetic exactly as
//! shipped: `1 - (matches/total) * 100`. It trends toward 100 as
//! failures trend toward 0 and goes negative once more than ~1% of
//! routes match. Readers have learned this scale; do not change the
//! formula without a product decision.

use fleetgate_core::{RouteHealth, RouteStatus};

/// Maximum number of lines a rendered route list may occupy, marker
/// included. Bounds message size for chat delivery.
pub const ROUTE_LINE_LIMIT: usize = 51;

/// A severity category, in the order it should appear in summaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDef {
    pub status: RouteHealth,
    pub emoji: &'static str,
    pub color: &'static str,
}

/// The categories the gateway reports on, worst first. Green routes
/// are deliberately not summarized.
pub fn default_categories() -> Vec<CategoryDef> {
    vec![
        CategoryDef {
            status: RouteHealth::Red,
            emoji: ":fire:",
            color: "danger",
        },
        CategoryDef {
            status: RouteHealth::Yellow,
            emoji: ":fire_engine:",
            color: "warning",
        },
    ]
}

/// One severity bucket derived from a snapshot. Never stored;
/// recomputed on every read.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBucket {
    pub category: CategoryDef,
    pub routes: Vec<RouteStatus>,
    pub total: usize,
    pub health: f64,
}

/// Partition routes into severity buckets, in caller-supplied category
/// order. Buckets with zero matches are omitted.
pub fn categorize(routes: &[RouteStatus], categories: &[CategoryDef]) -> Vec<CategoryBucket> {
    let total = routes.len();
    categories
        .iter()
        .filter_map(|category| {
            let matching: Vec<RouteStatus> = routes
                .iter()
                .filter(|route| route.status == category.status)
                .cloned()
                .collect();
            if matching.is_empty() {
                return None;
            }
            let health = health_percentage(matching.len(), total);
            Some(CategoryBucket {
                category: category.clone(),
                routes: matching,
                total,
                health,
            })
        })
        .collect()
}

/// `1 - (top/bottom) * 100`, or `0` when `bottom` is zero. Preserved
/// exactly, sign and scale included.
pub fn health_percentage(top: usize, bottom: usize) -> f64 {
    if bottom == 0 {
        return 0.0;
    }
    1.0 - ((top as f64 / bottom as f64) * 100.0)
}

/// Render routes as `METHOD /route` lines, at most [`ROUTE_LINE_LIMIT`]
/// lines. Lists that do not fit are cut to 50 literal lines plus a
/// final `"{n} more"` marker counting everything past line 51.
pub fn render_route_lines(routes: &[RouteStatus]) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    if routes.len() <= ROUTE_LINE_LIMIT {
        for route in routes {
            lines.push(format!("{} {}", route.method.to_uppercase(), route.route));
        }
        return lines;
    }

    for route in &routes[..ROUTE_LINE_LIMIT - 1] {
        lines.push(format!("{} {}", route.method.to_uppercase(), route.route));
    }
    lines.push(format!("{} more", routes.len() - ROUTE_LINE_LIMIT));
    lines
}
