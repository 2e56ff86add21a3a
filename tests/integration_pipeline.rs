//! End-to-end test of the price pipeline on a Latin-1 bulk download
//!
//! Writes a small FAOSTAT-style download to a temporary directory, runs the
//! processor through the public API and checks the exported tables.

use fao_price_processor::constants::output_files;
use fao_price_processor::{PipelineConfig, PriceProcessor};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DATA_HEADER: &str = "Area Code,Area,Item Code,Item,Element Code,Element,Unit,Y2010,Y2010F,Y2011,Y2011F,Y2012,Y2012F,Y2013,Y2013F,Y2023,Y2023F";

/// Encode text as Latin-1; every char must be below U+0100
fn latin1(text: &str) -> Vec<u8> {
    text.chars().map(|c| c as u32 as u8).collect()
}

fn write_download(dir: &Path) {
    fs::create_dir_all(dir).unwrap();

    let data = [
        DATA_HEADER,
        "107,Côte d'Ivoire,656,\"Coffee, green\",5539,Producer Price Index (2014-2016 = 100),,100,A,110,A,121,A,133.1,A,150,A",
        "107,Côte d'Ivoire,656,\"Coffee, green\",5532,Producer Price (USD/tonne),USD,1500,A,1600,A,1700,A,1800,A,1900,A",
        "4,Afghanistan,15,Wheat,5539,Producer Price Index (2014-2016 = 100),,40,A,,M,44,E,,M,60,A",
        "68,France,15,Wheat,5539,Producer Price Index (2014-2016 = 100),,100,A,101,A,102,A,103,A,80,A",
        "79,Germany,15,Wheat,5539,Producer Price Index (2014-2016 = 100),,120,A,,M,,M,,M,,M",
    ]
    .join("\n");
    fs::write(dir.join("Prices_E_All_Data.csv"), latin1(&(data + "\n"))).unwrap();

    fs::write(
        dir.join("Prices_E_AreaCodes.csv"),
        latin1("Area Code,M49 Code,Area\n4,'004,Afghanistan\n68,'250,France\n79,'276,Germany\n107,'384,Côte d'Ivoire\n"),
    )
    .unwrap();
    fs::write(
        dir.join("Prices_E_ItemCodes.csv"),
        latin1("Item Code,CPC Code,Item\n15,'0111,Wheat\n656,'01610,\"Coffee, green\"\n"),
    )
    .unwrap();
    fs::write(
        dir.join("Prices_E_Elements.csv"),
        latin1("Element Code,Element\n5532,Producer Price (USD/tonne)\n5539,Producer Price Index (2014-2016 = 100)\n"),
    )
    .unwrap();
    fs::write(
        dir.join("Prices_E_Flags.csv"),
        latin1("Flag,Description\nA,Official figure\nE,Estimated value\nM,\"Missing value (data cannot exist, not applicable)\"\n"),
    )
    .unwrap();
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_latin1_download_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("Prices_E_All_Data");
    let output_dir = temp_dir.path().join("output");
    write_download(&input_dir);

    let config = PipelineConfig::default()
        .with_input_dir(&input_dir)
        .with_output_dir(&output_dir);
    let report = PriceProcessor::new(config).unwrap().run().unwrap();

    assert!(report.validation.is_clean());
    assert_eq!(report.validation.geocoded_rows, 5);

    let reshape = report.reshape.unwrap();
    assert_eq!(reshape.rows_after_filter, 4);
    assert_eq!(reshape.flag_counts.get("M"), Some(&6));

    let cleaning = report.cleaning.unwrap();
    assert_eq!(cleaning.rows_before, 20);
    assert_eq!(cleaning.rows_after, 14);
    assert_eq!(cleaning.year_min, Some(2010));
    assert_eq!(cleaning.year_max, Some(2023));

    // Accented names survive decoding and resolve to their region
    let country = read_lines(&output_dir.join(output_files::COUNTRY_METRICS));
    assert_eq!(country.len(), 5);
    assert!(country[1].starts_with("Afghanistan,Asia,48.0,40.0,60.0,,50.0,3,"));
    assert!(country[2].starts_with("Côte d'Ivoire,Africa,"));
    assert!(country[2].ends_with(",50.0,5,2010,2023"));
    assert!(country[3].starts_with("France,Europe,"));
    assert!(country[3].ends_with(",-20.0,5,2010,2023"));
    assert_eq!(country[4], "Germany,Europe,120.0,120.0,120.0,,,1,2010,2010");

    let product = read_lines(&output_dir.join(output_files::PRODUCT_METRICS));
    assert_eq!(product.len(), 3);
    assert!(product[1].starts_with("\"Coffee, green\",Beverages,"));
    assert!(product[2].starts_with("Wheat,Cereals,"));

    let regional = read_lines(&output_dir.join(output_files::REGIONAL_AGGREGATES));
    assert!(regional.contains(&"Europe,2010,Cereals,110.0,14.14,100.0,120.0,2".to_string()));
    assert!(regional.contains(&"Asia,2023,Cereals,60.0,,60.0,60.0,1".to_string()));

    let long = read_lines(&output_dir.join(output_files::CLEAN_LONG));
    assert_eq!(long.len(), 15);
    // 2012 follows 2010 directly because 2011 is missing
    let afghanistan_2012 = long
        .iter()
        .find(|line| line.starts_with("Afghanistan,Wheat,") && line.contains(",2012,"))
        .unwrap();
    let yoy: f64 = afghanistan_2012.rsplit(',').next().unwrap().parse().unwrap();
    assert!((yoy - 10.0).abs() < 1e-9);
}
