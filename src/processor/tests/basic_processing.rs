//! Basic processing scenario tests

use super::{DEFAULT_ROWS, standard_setup, write_download};
use crate::config::{LabelGroup, PipelineConfig, SourceEncoding};
use crate::constants::output_files;
use crate::processor::PriceProcessor;
use std::fs;
use tempfile::TempDir;

fn read_lines(path: &std::path::Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn yoy(line: &str) -> f64 {
    line.rsplit(',').next().unwrap().parse().unwrap()
}

#[test]
fn test_basic_processing_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let (output_dir, config) = standard_setup(&temp_dir);

    let report = PriceProcessor::new(config).unwrap().run().unwrap();

    let reshape = report.reshape.as_ref().unwrap();
    assert_eq!(reshape.rows_before_filter, 4);
    assert_eq!(reshape.rows_after_filter, 3);
    assert_eq!(reshape.long_rows, 18);

    let cleaning = report.cleaning.as_ref().unwrap();
    assert_eq!(cleaning.rows_after, 12);
    assert_eq!(cleaning.rows_removed(), 6);

    assert_eq!(report.tables.len(), 5);
    let rows: Vec<usize> = report.tables.iter().map(|t| t.rows).collect();
    assert_eq!(rows, vec![12, 3, 2, 12, 3]);
    for table in &report.tables {
        assert!(table.path.starts_with(&output_dir));
        assert!(table.path.exists());
    }
}

#[test]
fn test_clean_long_table_contents() {
    let temp_dir = TempDir::new().unwrap();
    let (output_dir, config) = standard_setup(&temp_dir);

    PriceProcessor::new(config).unwrap().run().unwrap();

    let lines = read_lines(&output_dir.join(output_files::CLEAN_LONG));
    assert_eq!(
        lines[0],
        "area,item,element,year,price,region,product_category,yoy_change"
    );
    assert_eq!(lines.len(), 13);

    // France/Wheat: 2021 is missing, so 2022 compares against 2020
    let france: Vec<&String> = lines.iter().filter(|l| l.starts_with("France,")).collect();
    assert_eq!(france.len(), 5);
    assert!(france[0].contains(",2010,"));
    assert!(france[0].ends_with(",Europe,Cereals,"));
    assert!(france[2].contains(",2020,"));
    assert!((yoy(france[2]) - 10.0).abs() < 1e-9);
    assert!(france[3].contains(",2022,"));
    assert!((yoy(france[3]) + 10.0).abs() < 1e-9);

    let nowhere = lines.iter().find(|l| l.starts_with("Nowhereland,")).unwrap();
    assert!(nowhere.contains(",Other,Cereals,"));
}

#[test]
fn test_country_metrics_contents() {
    let temp_dir = TempDir::new().unwrap();
    let (output_dir, config) = standard_setup(&temp_dir);

    PriceProcessor::new(config).unwrap().run().unwrap();

    let lines = read_lines(&output_dir.join(output_files::COUNTRY_METRICS));
    assert_eq!(
        lines[0],
        "area,region,avg_price,min_price,max_price,volatility,trend,data_points,year_min,year_max"
    );
    assert!(lines[1].starts_with("France,Europe,101.8,80.0,120.0,"));
    assert!(lines[1].ends_with(",50.0,5,2010,2023"));
    assert!(lines[2].starts_with("Germany,Europe,"));
    // Single observation: no volatility and no trend, basic metrics kept
    assert_eq!(lines[3], "Nowhereland,Other,10.0,10.0,10.0,,,1,2019,2019");
}

#[test]
fn test_rerun_is_byte_identical() {
    let temp_dir = TempDir::new().unwrap();
    let (output_dir, config) = standard_setup(&temp_dir);

    PriceProcessor::new(config.clone()).unwrap().run().unwrap();
    let first: Vec<Vec<u8>> = all_outputs(&output_dir);

    PriceProcessor::new(config).unwrap().run().unwrap();
    let second: Vec<Vec<u8>> = all_outputs(&output_dir);

    assert_eq!(first, second);
}

fn all_outputs(output_dir: &std::path::Path) -> Vec<Vec<u8>> {
    [
        output_files::CLEAN_LONG,
        output_files::COUNTRY_METRICS,
        output_files::PRODUCT_METRICS,
        output_files::REGIONAL_AGGREGATES,
        output_files::COUNTRY_CATEGORY_METRICS,
    ]
    .iter()
    .map(|name| fs::read(output_dir.join(name)).unwrap())
    .collect()
}

#[test]
fn test_row_order_does_not_change_output() {
    let temp_dir = TempDir::new().unwrap();
    let (output_dir, config) = standard_setup(&temp_dir);
    PriceProcessor::new(config).unwrap().run().unwrap();
    let expected = all_outputs(&output_dir);

    let reversed_dir = temp_dir.path().join("reversed");
    let mut rows = DEFAULT_ROWS.to_vec();
    rows.reverse();
    write_download(&reversed_dir, &rows, true);
    let reversed_output = temp_dir.path().join("reversed_output");
    let config = PipelineConfig::default()
        .with_input_dir(&reversed_dir)
        .with_output_dir(&reversed_output)
        .with_encoding(SourceEncoding::Utf8);
    PriceProcessor::new(config).unwrap().run().unwrap();

    assert_eq!(all_outputs(&reversed_output), expected);
}

#[test]
fn test_validate_only_mode() {
    let temp_dir = TempDir::new().unwrap();
    let (output_dir, config) = standard_setup(&temp_dir);

    let report = PriceProcessor::new(config.with_validate_only())
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(report.validation.total_rows, 4);
    assert_eq!(report.validation.mismatch_count(), 1);
    assert_eq!(report.validation.coverage[0].missing, vec!["999".to_string()]);
    assert_eq!(report.validation.geocoded_rows, 3);
    assert_eq!(report.validation.flags.len(), 3);
    assert!(report.reshape.is_none());
    assert!(report.tables.is_empty());

    // Output directory is not created
    assert!(!output_dir.exists());
}

#[test]
fn test_custom_lookup_tables() {
    let temp_dir = TempDir::new().unwrap();
    let (output_dir, config) = standard_setup(&temp_dir);
    let config = config
        .with_regions(vec![LabelGroup {
            label: "Western Europe".to_string(),
            members: vec!["France".to_string(), "Nowhereland".to_string()],
        }])
        .with_categories(vec![LabelGroup {
            label: "Staples".to_string(),
            members: vec!["Wheat".to_string()],
        }]);

    PriceProcessor::new(config).unwrap().run().unwrap();

    let lines = read_lines(&output_dir.join(output_files::COUNTRY_CATEGORY_METRICS));
    assert_eq!(
        lines[0],
        "area,region,product_category,avg_price,min_price,max_price,volatility,trend,data_points,year_min,year_max"
    );
    assert!(lines[1].starts_with("France,Western Europe,Staples,"));
    assert!(lines[2].starts_with("Germany,Other,Other,"));
    assert!(lines[3].starts_with("Nowhereland,Western Europe,Staples,"));
}

#[test]
fn test_flags_table_is_optional() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("no_flags");
    write_download(&input_dir, DEFAULT_ROWS, false);

    let config = PipelineConfig::default()
        .with_input_dir(&input_dir)
        .with_output_dir(temp_dir.path().join("out"))
        .with_encoding(SourceEncoding::Utf8);
    let report = PriceProcessor::new(config).unwrap().run().unwrap();

    assert!(report.validation.flags.is_empty());
    assert_eq!(report.tables.len(), 5);
}
