// Renderer module - formatting utilities
// Most rendering logic is in layout.rs

use crate::fares::PricePoint;

/// Format a fare for axis labels
pub fn format_price(amount: f64) -> String {
    format!("${:.0}", amount)
}

/// Y-axis bounds covering every series, padded so lines don't hug the border
pub fn price_bounds(points: &[PricePoint]) -> [f64; 2] {
    let values = points
        .iter()
        .flat_map(|p| [p.outbound, p.inbound, p.roundtrip])
        .filter(|v| v.is_finite());

    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if !min.is_finite() || !max.is_finite() {
        return [0.0, 100.0];
    }

    let pad = ((max - min) * 0.1).max(10.0);
    [(min - pad).max(0.0), max + pad]
}
