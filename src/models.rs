//! Core data structures for price processing.
//!
//! Record types for each pipeline stage (wide row, long observation, enriched
//! observation), the summary rows of the output tables, and the statistics
//! each stage reports.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// One year cell of a wide row: the value and its quality flag
#[derive(Debug, Clone, PartialEq)]
pub struct YearCell {
    pub value: Option<f64>,
    pub flag: Option<String>,
}

/// One row of the primary dataset in wide form
#[derive(Debug, Clone, PartialEq)]
pub struct WideRecord {
    pub area_code: String,
    pub area: String,
    pub item_code: String,
    pub item: String,
    pub element_code: String,
    pub element: String,
    pub years: BTreeMap<i32, YearCell>,
}

/// Long-form observation straight out of the reshape; the price may be missing
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    pub area: String,
    pub item: String,
    pub element: String,
    pub year: i32,
    pub price: Option<f64>,
}

/// Long-form observation with a present price
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub area: String,
    pub item: String,
    pub element: String,
    pub year: i32,
    pub price: f64,
}

/// Observation with its derived labels and year-over-year change
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedObservation {
    pub area: String,
    pub item: String,
    pub element: String,
    pub year: i32,
    pub price: f64,
    pub region: String,
    pub product_category: String,
    /// Percent change from the preceding observation of the same (area, item)
    pub yoy_change: Option<f64>,
}

/// Summary metrics for one group of observations
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub volatility: Option<f64>,
    pub trend: Option<f64>,
    pub data_points: usize,
    pub year_min: i32,
    pub year_max: i32,
}

/// Per-country summary row
#[derive(Debug, Clone, PartialEq)]
pub struct CountryMetrics {
    pub area: String,
    pub region: String,
    pub summary: SeriesSummary,
}

/// Per-product summary row
#[derive(Debug, Clone, PartialEq)]
pub struct ProductMetrics {
    pub item: String,
    pub product_category: String,
    pub summary: SeriesSummary,
}

/// Per (country, region, category) summary row
#[derive(Debug, Clone, PartialEq)]
pub struct CountryCategoryMetrics {
    pub area: String,
    pub region: String,
    pub product_category: String,
    pub summary: SeriesSummary,
}

/// Per (region, year, category) price distribution
#[derive(Debug, Clone, PartialEq)]
pub struct RegionalAggregate {
    pub region: String,
    pub year: i32,
    pub product_category: String,
    pub avg_price: f64,
    /// Sample standard deviation; undefined for a single observation
    pub std_price: Option<f64>,
    pub min_price: f64,
    pub max_price: f64,
    pub count: usize,
}

/// Statistics reported by the reshape stage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReshapeStats {
    pub rows_before_filter: usize,
    pub rows_after_filter: usize,
    pub distinct_areas: usize,
    pub distinct_items: usize,
    pub year_value_columns: usize,
    pub year_flag_columns: usize,
    pub long_rows: usize,
    /// Occurrences of each quality flag in the retained rows
    pub flag_counts: BTreeMap<String, usize>,
}

/// Statistics reported by the cleaning stage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleaningStats {
    pub rows_before: usize,
    pub rows_after: usize,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    pub years_with_data: usize,
}

impl CleaningStats {
    pub fn rows_removed(&self) -> usize {
        self.rows_before - self.rows_after
    }

    /// Share of reshaped rows without a price, as a percentage
    pub fn missing_percentage(&self) -> f64 {
        if self.rows_before == 0 {
            0.0
        } else {
            self.rows_removed() as f64 / self.rows_before as f64 * 100.0
        }
    }
}

/// Statistics reported by the enrichment stage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentStats {
    /// Distinct areas per region label
    pub areas_per_region: BTreeMap<String, usize>,
    /// Observations per category label
    pub observations_per_category: BTreeMap<String, usize>,
    pub valid_yoy: usize,
}

/// One written output table
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenTable {
    pub path: PathBuf,
    pub rows: usize,
}
