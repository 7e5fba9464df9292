//! "What could you buy with it" translation of a savings amount.

use ordered_float::OrderedFloat;

use crate::types::{Equivalent, EquivalentGoodItem};

/// Counts below this are too small to show.
pub const MIN_COUNT: f64 = 0.1;

/// Count the ranking prefers: "about three of these" reads best.
pub const PREFERRED_COUNT: f64 = 3.0;

/// Rank catalog items by how close their count is to [`PREFERRED_COUNT`]
/// on a log scale and return the best `max_items`.
///
/// Returns an empty list for a non-positive amount. Ties keep catalog order.
pub fn compute_equivalents(
    amount_usd: f64,
    catalog: &[EquivalentGoodItem],
    max_items: usize,
) -> Vec<Equivalent> {
    if amount_usd.is_nan() || amount_usd <= 0.0 {
        return Vec::new();
    }

    let target = PREFERRED_COUNT.log10();
    let mut ranked: Vec<Equivalent> = catalog
        .iter()
        .filter(|item| item.unit_price_usd > 0.0)
        .map(|item| Equivalent {
            item: item.clone(),
            count: amount_usd / item.unit_price_usd,
        })
        .filter(|e| e.count >= MIN_COUNT)
        .collect();

    // Stable sort keeps catalog order among equal distances.
    ranked.sort_by_key(|e| OrderedFloat((e.count.log10() - target).abs()));
    ranked.truncate(max_items);
    ranked
}
