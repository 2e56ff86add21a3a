//! CSV writing of the output tables
//!
//! Each table is converted to a Polars DataFrame with a fixed column order and
//! written with the Polars CSV writer. Summary statistics are rounded to two
//! decimals here; the long table keeps full precision.

use crate::aggregate::AggregateTables;
use crate::constants::{EXPORT_DECIMALS, output_files};
use crate::error::{PriceError, Result};
use crate::models::{
    CountryCategoryMetrics, CountryMetrics, EnrichedObservation, ProductMetrics,
    RegionalAggregate, SeriesSummary, WrittenTable,
};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Round to a fixed number of decimals, ties to even
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

fn rounded(value: f64) -> f64 {
    round_to(value, EXPORT_DECIMALS)
}

fn rounded_opt(value: Option<f64>) -> Option<f64> {
    value.map(rounded)
}

/// Writes the output tables into one directory
#[derive(Debug)]
pub struct TableWriter {
    output_dir: PathBuf,
}

impl TableWriter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Write all five tables, creating the output directory if needed
    pub fn write_all(&self, tables: &AggregateTables) -> Result<Vec<WrittenTable>> {
        fs::create_dir_all(&self.output_dir)?;

        let frames = [
            (output_files::CLEAN_LONG, clean_long_frame(&tables.clean_long)?),
            (output_files::COUNTRY_METRICS, country_frame(&tables.country)?),
            (output_files::PRODUCT_METRICS, product_frame(&tables.product)?),
            (
                output_files::REGIONAL_AGGREGATES,
                regional_frame(&tables.regional)?,
            ),
            (
                output_files::COUNTRY_CATEGORY_METRICS,
                country_category_frame(&tables.country_category)?,
            ),
        ];

        let mut written = Vec::with_capacity(frames.len());
        for (name, mut df) in frames {
            let path = self.output_dir.join(name);
            self.write_frame(&path, &mut df)?;
            written.push(WrittenTable {
                path,
                rows: df.height(),
            });
        }

        Ok(written)
    }

    fn write_frame(&self, path: &Path, df: &mut DataFrame) -> Result<()> {
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .finish(df)
            .map_err(|e| {
                PriceError::Io(std::io::Error::other(format!(
                    "Failed to write {}: {}",
                    path.display(),
                    e
                )))
            })?;

        debug!("Wrote {} rows to {}", df.height(), path.display());
        Ok(())
    }
}

/// Enriched long table, unrounded
pub fn clean_long_frame(rows: &[EnrichedObservation]) -> Result<DataFrame> {
    let df = DataFrame::new(vec![
        Column::new("area".into(), rows.iter().map(|r| r.area.as_str()).collect::<Vec<_>>()),
        Column::new("item".into(), rows.iter().map(|r| r.item.as_str()).collect::<Vec<_>>()),
        Column::new(
            "element".into(),
            rows.iter().map(|r| r.element.as_str()).collect::<Vec<_>>(),
        ),
        Column::new("year".into(), rows.iter().map(|r| r.year).collect::<Vec<_>>()),
        Column::new("price".into(), rows.iter().map(|r| r.price).collect::<Vec<_>>()),
        Column::new(
            "region".into(),
            rows.iter().map(|r| r.region.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "product_category".into(),
            rows.iter().map(|r| r.product_category.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "yoy_change".into(),
            rows.iter().map(|r| r.yoy_change).collect::<Vec<_>>(),
        ),
    ])?;
    Ok(df)
}

/// Metric columns shared by the three summary tables
fn summary_columns<'a>(summaries: impl Iterator<Item = &'a SeriesSummary> + Clone) -> Vec<Column> {
    let s = summaries;
    vec![
        Column::new(
            "avg_price".into(),
            s.clone().map(|m| rounded(m.avg_price)).collect::<Vec<_>>(),
        ),
        Column::new(
            "min_price".into(),
            s.clone().map(|m| rounded(m.min_price)).collect::<Vec<_>>(),
        ),
        Column::new(
            "max_price".into(),
            s.clone().map(|m| rounded(m.max_price)).collect::<Vec<_>>(),
        ),
        Column::new(
            "volatility".into(),
            s.clone().map(|m| rounded_opt(m.volatility)).collect::<Vec<_>>(),
        ),
        Column::new(
            "trend".into(),
            s.clone().map(|m| rounded_opt(m.trend)).collect::<Vec<_>>(),
        ),
        Column::new(
            "data_points".into(),
            s.clone().map(|m| m.data_points as u32).collect::<Vec<_>>(),
        ),
        Column::new(
            "year_min".into(),
            s.clone().map(|m| m.year_min).collect::<Vec<_>>(),
        ),
        Column::new("year_max".into(), s.map(|m| m.year_max).collect::<Vec<_>>()),
    ]
}

pub fn country_frame(rows: &[CountryMetrics]) -> Result<DataFrame> {
    let mut columns = vec![
        Column::new("area".into(), rows.iter().map(|r| r.area.as_str()).collect::<Vec<_>>()),
        Column::new(
            "region".into(),
            rows.iter().map(|r| r.region.as_str()).collect::<Vec<_>>(),
        ),
    ];
    columns.extend(summary_columns(rows.iter().map(|r| &r.summary)));
    Ok(DataFrame::new(columns)?)
}

pub fn product_frame(rows: &[ProductMetrics]) -> Result<DataFrame> {
    let mut columns = vec![
        Column::new("item".into(), rows.iter().map(|r| r.item.as_str()).collect::<Vec<_>>()),
        Column::new(
            "product_category".into(),
            rows.iter().map(|r| r.product_category.as_str()).collect::<Vec<_>>(),
        ),
    ];
    columns.extend(summary_columns(rows.iter().map(|r| &r.summary)));
    Ok(DataFrame::new(columns)?)
}

pub fn country_category_frame(rows: &[CountryCategoryMetrics]) -> Result<DataFrame> {
    let mut columns = vec![
        Column::new("area".into(), rows.iter().map(|r| r.area.as_str()).collect::<Vec<_>>()),
        Column::new(
            "region".into(),
            rows.iter().map(|r| r.region.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "product_category".into(),
            rows.iter().map(|r| r.product_category.as_str()).collect::<Vec<_>>(),
        ),
    ];
    columns.extend(summary_columns(rows.iter().map(|r| &r.summary)));
    Ok(DataFrame::new(columns)?)
}

pub fn regional_frame(rows: &[RegionalAggregate]) -> Result<DataFrame> {
    let df = DataFrame::new(vec![
        Column::new(
            "region".into(),
            rows.iter().map(|r| r.region.as_str()).collect::<Vec<_>>(),
        ),
        Column::new("year".into(), rows.iter().map(|r| r.year).collect::<Vec<_>>()),
        Column::new(
            "product_category".into(),
            rows.iter().map(|r| r.product_category.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "avg_price".into(),
            rows.iter().map(|r| rounded(r.avg_price)).collect::<Vec<_>>(),
        ),
        Column::new(
            "std_price".into(),
            rows.iter().map(|r| rounded_opt(r.std_price)).collect::<Vec<_>>(),
        ),
        Column::new(
            "min_price".into(),
            rows.iter().map(|r| rounded(r.min_price)).collect::<Vec<_>>(),
        ),
        Column::new(
            "max_price".into(),
            rows.iter().map(|r| rounded(r.max_price)).collect::<Vec<_>>(),
        ),
        Column::new("count".into(), rows.iter().map(|r| r.count as u32).collect::<Vec<_>>()),
    ])?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn summary() -> SeriesSummary {
        SeriesSummary {
            avg_price: 101.23456,
            min_price: 99.0,
            max_price: 110.0,
            volatility: None,
            trend: Some(12.345),
            data_points: 3,
            year_min: 2019,
            year_max: 2022,
        }
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(101.23456, 2), 101.23);
        assert_eq!(round_to(7.0, 2), 7.0);
        assert_eq!(round_to(-3.456, 2), -3.46);
    }

    #[test]
    fn test_round_to_ties_go_to_even() {
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(10.625, 2), 10.62);
        assert_eq!(round_to(-0.125, 2), -0.12);
    }

    #[test]
    fn test_country_frame_columns_and_rounding() {
        let df = country_frame(&[CountryMetrics {
            area: "France".to_string(),
            region: "Europe".to_string(),
            summary: summary(),
        }])
        .unwrap();

        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "area", "region", "avg_price", "min_price", "max_price", "volatility", "trend",
                "data_points", "year_min", "year_max"
            ]
        );
        let avg = df.column("avg_price").unwrap().f64().unwrap().get(0);
        assert_eq!(avg, Some(101.23));
        let volatility = df.column("volatility").unwrap().f64().unwrap().get(0);
        assert_eq!(volatility, None);
    }

    #[test]
    fn test_long_frame_keeps_precision() {
        let df = clean_long_frame(&[EnrichedObservation {
            area: "France".to_string(),
            item: "Wheat".to_string(),
            element: "Producer Price Index (2014-2016 = 100)".to_string(),
            year: 2020,
            price: 110.123456,
            region: "Europe".to_string(),
            product_category: "Cereals".to_string(),
            yoy_change: Some(10.123456),
        }])
        .unwrap();

        assert_eq!(df.width(), 8);
        assert_eq!(
            df.column("price").unwrap().f64().unwrap().get(0),
            Some(110.123456)
        );
    }

    #[test]
    fn test_write_all_creates_directory_and_files() {
        let temp_dir = TempDir::new().unwrap();
        let output_dir = temp_dir.path().join("nested").join("output");
        let writer = TableWriter::new(output_dir.clone());

        let written = writer.write_all(&AggregateTables::default()).unwrap();

        assert_eq!(written.len(), 5);
        for table in &written {
            assert!(table.path.exists());
            assert_eq!(table.rows, 0);
        }
        let header = fs::read_to_string(output_dir.join(output_files::REGIONAL_AGGREGATES)).unwrap();
        assert_eq!(
            header.trim_end(),
            "region,year,product_category,avg_price,std_price,min_price,max_price,count"
        );
    }
}
