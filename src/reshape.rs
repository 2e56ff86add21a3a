//! Element filtering and wide-to-long reshaping.
//!
//! The primary dataset carries one value column `Y<year>` and one flag column
//! `Y<year>F` per year. The [`Reshaper`] keeps the rows of a single element
//! series and turns every (row, year) cell into one [`RawObservation`]. Flags
//! are tallied for the report but are not carried into the long form.

use crate::constants::{YEAR_FLAG_PATTERN, YEAR_VALUE_PATTERN, columns};
use crate::error::{PriceError, Result};
use crate::models::{RawObservation, ReshapeStats, WideRecord, YearCell};
use crate::source::{require_columns, string_values};
use polars::prelude::*;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

const STAGE: &str = "reshape";

/// Year columns of the primary dataset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearColumns {
    /// (year, value column name), ascending by year
    pub values: Vec<(i32, String)>,
    /// year → flag column name
    pub flags: BTreeMap<i32, String>,
}

/// Filters the primary dataset to one element and pivots it to long form
#[derive(Debug, Clone)]
pub struct Reshaper {
    element_code: String,
    value_pattern: Regex,
    flag_pattern: Regex,
}

impl Reshaper {
    pub fn new(element_code: impl Into<String>) -> Result<Self> {
        let value_pattern = Regex::new(YEAR_VALUE_PATTERN)
            .map_err(|e| PriceError::configuration(format!("invalid year pattern: {}", e)))?;
        let flag_pattern = Regex::new(YEAR_FLAG_PATTERN)
            .map_err(|e| PriceError::configuration(format!("invalid flag pattern: {}", e)))?;

        Ok(Self {
            element_code: element_code.into().trim().to_string(),
            value_pattern,
            flag_pattern,
        })
    }

    /// Identify year-value and year-flag columns by name
    pub fn year_columns(&self, df: &DataFrame) -> YearColumns {
        let mut year_columns = YearColumns::default();

        for name in df.get_column_names() {
            let name = name.as_str();
            if let Some(year) = capture_year(&self.value_pattern, name) {
                year_columns.values.push((year, name.to_string()));
            } else if let Some(year) = capture_year(&self.flag_pattern, name) {
                year_columns.flags.insert(year, name.to_string());
            }
        }

        year_columns.values.sort_by_key(|(year, _)| *year);
        year_columns
    }

    /// Keep only the rows of the target element, ignoring padding around codes
    pub fn filter_element(&self, df: &DataFrame) -> Result<DataFrame> {
        let filtered = df
            .clone()
            .lazy()
            .filter(
                col(columns::ELEMENT_CODE)
                    .str()
                    .strip_chars(lit(NULL))
                    .eq(lit(self.element_code.clone())),
            )
            .collect()?;
        Ok(filtered)
    }

    /// Read the rows of a frame into wide records
    pub fn wide_records(&self, df: &DataFrame, year_columns: &YearColumns) -> Result<Vec<WideRecord>> {
        let area_codes = string_values(df, columns::AREA_CODE, STAGE)?;
        let areas = string_values(df, columns::AREA, STAGE)?;
        let item_codes = string_values(df, columns::ITEM_CODE, STAGE)?;
        let items = string_values(df, columns::ITEM, STAGE)?;
        let element_codes = string_values(df, columns::ELEMENT_CODE, STAGE)?;
        let elements = string_values(df, columns::ELEMENT, STAGE)?;

        let mut value_columns = Vec::with_capacity(year_columns.values.len());
        for (year, name) in &year_columns.values {
            let flags = match year_columns.flags.get(year) {
                Some(flag_name) => Some(string_values(df, flag_name, STAGE)?),
                None => None,
            };
            value_columns.push((*year, string_values(df, name, STAGE)?, flags));
        }

        let records = (0..df.height())
            .map(|i| WideRecord {
                area_code: cell_text(&area_codes, i),
                area: cell_text(&areas, i),
                item_code: cell_text(&item_codes, i),
                item: cell_text(&items, i),
                element_code: cell_text(&element_codes, i),
                element: cell_text(&elements, i),
                years: value_columns
                    .iter()
                    .map(|(year, values, flags)| {
                        let cell = YearCell {
                            value: values[i].and_then(parse_price),
                            flag: flags
                                .as_ref()
                                .and_then(|f| f[i])
                                .map(str::trim)
                                .filter(|f| !f.is_empty())
                                .map(str::to_string),
                        };
                        (*year, cell)
                    })
                    .collect(),
            })
            .collect();

        Ok(records)
    }

    /// Filter to the target element and emit one observation per (row, year)
    pub fn reshape(&self, df: &DataFrame) -> Result<(Vec<RawObservation>, ReshapeStats)> {
        require_columns(df, columns::PRIMARY_ID_COLUMNS, STAGE)?;

        let year_columns = self.year_columns(df);
        if year_columns.values.is_empty() {
            return Err(PriceError::schema(
                STAGE,
                "no year value columns (Y<year>) found in the primary dataset",
            ));
        }
        debug!(
            "Found {} year value columns ({}..={}) and {} flag columns",
            year_columns.values.len(),
            year_columns.values[0].0,
            year_columns.values[year_columns.values.len() - 1].0,
            year_columns.flags.len()
        );

        let filtered = self.filter_element(df)?;
        if filtered.height() == 0 {
            return Err(PriceError::schema(
                STAGE,
                format!(
                    "element code {} does not occur in the primary dataset",
                    self.element_code
                ),
            ));
        }

        let records = self.wide_records(&filtered, &year_columns)?;
        let observations = to_long(&records);

        let mut flag_counts = BTreeMap::new();
        for record in &records {
            for flag in record.years.values().filter_map(|cell| cell.flag.as_ref()) {
                *flag_counts.entry(flag.clone()).or_insert(0) += 1;
            }
        }

        let stats = ReshapeStats {
            rows_before_filter: df.height(),
            rows_after_filter: filtered.height(),
            distinct_areas: records.iter().map(|r| r.area.as_str()).collect::<BTreeSet<_>>().len(),
            distinct_items: records.iter().map(|r| r.item.as_str()).collect::<BTreeSet<_>>().len(),
            year_value_columns: year_columns.values.len(),
            year_flag_columns: year_columns.flags.len(),
            long_rows: observations.len(),
            flag_counts,
        };

        info!(
            "Element {}: {} -> {} rows, {} long observations",
            self.element_code, stats.rows_before_filter, stats.rows_after_filter, stats.long_rows
        );

        Ok((observations, stats))
    }
}

/// Pivot wide records to long observations, row by row in ascending year order
pub fn to_long(records: &[WideRecord]) -> Vec<RawObservation> {
    records
        .iter()
        .flat_map(|record| {
            record.years.iter().map(move |(year, cell)| RawObservation {
                area: record.area.clone(),
                item: record.item.clone(),
                element: record.element.clone(),
                year: *year,
                price: cell.value,
            })
        })
        .collect()
}

fn cell_text(values: &[Option<&str>], i: usize) -> String {
    values[i].map(str::trim).unwrap_or_default().to_string()
}

fn capture_year(pattern: &Regex, name: &str) -> Option<i32> {
    pattern
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Parse a price cell; blanks and non-finite numbers count as missing
fn parse_price(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
