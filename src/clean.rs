//! Removal of observations without a price.

use crate::models::{CleaningStats, Observation, RawObservation};
use std::collections::BTreeSet;
use tracing::info;

/// Drop every observation whose price is missing, keeping the order of the rest.
///
/// Zero and negative prices are real values and are kept.
pub fn clean(raw: Vec<RawObservation>) -> (Vec<Observation>, CleaningStats) {
    let rows_before = raw.len();

    let observations: Vec<Observation> = raw
        .into_iter()
        .filter_map(|obs| {
            obs.price.map(|price| Observation {
                area: obs.area,
                item: obs.item,
                element: obs.element,
                year: obs.year,
                price,
            })
        })
        .collect();

    let years: BTreeSet<i32> = observations.iter().map(|o| o.year).collect();
    let stats = CleaningStats {
        rows_before,
        rows_after: observations.len(),
        year_min: years.first().copied(),
        year_max: years.last().copied(),
        years_with_data: years.len(),
    };

    info!(
        "Cleaning: {} -> {} rows ({} removed, {:.1}% missing)",
        stats.rows_before,
        stats.rows_after,
        stats.rows_removed(),
        stats.missing_percentage()
    );

    (observations, stats)
}
