//! Time-series metrics over groups of observations.
//!
//! [`summarize`] computes a [`SeriesSummary`] for one group of (year, price)
//! points. [`summarize_by`] groups observations with a key function and
//! summarizes each group, so country, product and country×category metrics
//! share one implementation.

use crate::constants::{
    TREND_END_YEAR, TREND_START_YEAR, VOLATILITY_MIN_CHANGES, VOLATILITY_MIN_POINTS,
};
use crate::models::{EnrichedObservation, SeriesSummary};
use std::collections::BTreeMap;

/// Percent change from `previous` to `current`.
///
/// `None` when the predecessor is not strictly positive or the result is not
/// a finite number.
pub fn percent_change(previous: f64, current: f64) -> Option<f64> {
    if previous <= 0.0 || !previous.is_finite() {
        return None;
    }
    let change = (current - previous) / previous * 100.0;
    change.is_finite().then_some(change)
}

/// Sequential percent changes of a year-ordered series, skipping undefined ones
pub fn sequential_changes(points: &[(i32, f64)]) -> Vec<f64> {
    points
        .windows(2)
        .filter_map(|pair| percent_change(pair[0].1, pair[1].1))
        .collect()
}

/// Population standard deviation of the sequential percent changes.
///
/// Requires at least five points and three defined changes.
pub fn volatility(points: &[(i32, f64)]) -> Option<f64> {
    if points.len() < VOLATILITY_MIN_POINTS {
        return None;
    }
    let changes = sequential_changes(points);
    if changes.len() < VOLATILITY_MIN_CHANGES {
        return None;
    }
    Some(std_dev(&changes, 0))
}

/// Percent change between the first observations of the two anchor years
pub fn trend(points: &[(i32, f64)]) -> Option<f64> {
    let first_in = |year: i32| {
        points
            .iter()
            .find(|(y, _)| *y == year)
            .map(|(_, price)| *price)
    };
    let start = first_in(TREND_START_YEAR)?;
    let end = first_in(TREND_END_YEAR)?;
    percent_change(start, end)
}

/// Summarize one group; `None` for an empty group.
///
/// Points are ordered by year before any sequential metric is taken. The sort
/// is stable, so points sharing a year keep their input order.
pub fn summarize(points: &[(i32, f64)]) -> Option<SeriesSummary> {
    if points.is_empty() {
        return None;
    }

    let mut sorted = points.to_vec();
    sorted.sort_by_key(|(year, _)| *year);

    let prices: Vec<f64> = sorted.iter().map(|(_, price)| *price).collect();
    let min_price = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max_price = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(SeriesSummary {
        avg_price: mean(&prices),
        min_price,
        max_price,
        volatility: volatility(&sorted),
        trend: trend(&sorted),
        data_points: sorted.len(),
        year_min: sorted[0].0,
        year_max: sorted[sorted.len() - 1].0,
    })
}

/// Group observations by `key` and summarize every group, in key order
pub fn summarize_by<K, F>(observations: &[EnrichedObservation], key: F) -> Vec<(K, SeriesSummary)>
where
    K: Ord,
    F: Fn(&EnrichedObservation) -> K,
{
    let mut groups: BTreeMap<K, Vec<(i32, f64)>> = BTreeMap::new();
    for obs in observations {
        groups.entry(key(obs)).or_default().push((obs.year, obs.price));
    }

    groups
        .into_iter()
        .filter_map(|(k, points)| summarize(&points).map(|summary| (k, summary)))
        .collect()
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with `ddof` delta degrees of freedom (0 population, 1 sample)
pub fn std_dev(values: &[f64], ddof: usize) -> f64 {
    let avg = mean(values);
    let squares: f64 = values.iter().map(|v| (v - avg).powi(2)).sum();
    (squares / (values.len() - ddof) as f64).sqrt()
}
