//! Join schema records with global percentages and rank them.

use std::cmp::Ordering;

use common::{Achievement, PercentageMap};

/// Most unlocked first, then display name ascending. The stable key breaks
/// any remaining tie so the order is total.
pub fn rank_order(a: &Achievement, b: &Achievement) -> Ordering {
    b.global_pct
        .total_cmp(&a.global_pct)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.api_name.cmp(&b.api_name))
}

/// Fill each achievement's percentage from `percentages` (0.0 when the key is
/// absent) and return the full list in [`rank_order`].
///
/// Keys only present in `percentages` are ignored.
pub fn merge_and_rank(schema: Vec<Achievement>, percentages: &PercentageMap) -> Vec<Achievement> {
    let mut merged: Vec<Achievement> = schema
        .into_iter()
        .map(|mut ach| {
            ach.global_pct = percentages.get(&ach.api_name).copied().unwrap_or(0.0);
            ach
        })
        .collect();

    merged.sort_by(rank_order);
    merged
}
