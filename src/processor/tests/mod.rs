//! Scenario tests for the pipeline driver
//!
//! Runs the complete pipeline on small bulk downloads written to a temporary
//! directory.

pub mod basic_processing;

use crate::config::PipelineConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const DATA_HEADER: &str = "Area Code,Area Code (M49),Area,Item Code,Item Code (CPC),Item,Element Code,Element,Unit,Y2010,Y2010F,Y2019,Y2019F,Y2020,Y2020F,Y2021,Y2021F,Y2022,Y2022F,Y2023,Y2023F";

pub const DEFAULT_ROWS: &[&str] = &[
    "68,'250,France,15,'0111,Wheat,5539,Producer Price Index (2014-2016 = 100),,80,A,100,A,110,A,,M,99,A,120,A",
    "68,'250,France,15,'0111,Wheat,5532,Producer Price (USD/tonne),USD,150,A,200,A,210,A,220,A,230,A,240,A",
    "79,'276,Germany,515,'01341,Apples,5539,Producer Price Index (2014-2016 = 100),,50,A,90,A,95,E,100,A,105,A,75,A",
    "999,'999,Nowhereland,15,'0111,Wheat,5539,Producer Price Index (2014-2016 = 100),,,M,10,E,,M,,M,,M,,M",
];

/// Write a bulk download with the given primary rows
pub fn write_download(dir: &Path, rows: &[&str], with_flags: bool) {
    fs::create_dir_all(dir).unwrap();

    let mut data = String::from(DATA_HEADER);
    for row in rows {
        data.push('\n');
        data.push_str(row);
    }
    data.push('\n');
    fs::write(dir.join("Prices_E_All_Data.csv"), data).unwrap();

    fs::write(
        dir.join("Prices_E_AreaCodes.csv"),
        "Area Code,M49 Code,Area\n68,'250,France\n79,'276,Germany\n",
    )
    .unwrap();
    fs::write(
        dir.join("Prices_E_ItemCodes.csv"),
        "Item Code,CPC Code,Item\n15,'0111,Wheat\n515,'01341,Apples\n",
    )
    .unwrap();
    fs::write(
        dir.join("Prices_E_Elements.csv"),
        "Element Code,Element\n5530,Producer Price (LCU/tonne)\n5532,Producer Price (USD/tonne)\n5539,Producer Price Index (2014-2016 = 100)\n",
    )
    .unwrap();
    if with_flags {
        fs::write(
            dir.join("Prices_E_Flags.csv"),
            "Flag,Description\nA,Official figure\nE,Estimated value\nM,Missing value\n",
        )
        .unwrap();
    }
}

/// A standard download plus a config pointing at it
pub fn standard_setup(temp_dir: &TempDir) -> (PathBuf, PipelineConfig) {
    let input_dir = temp_dir.path().join("Prices_E_All_Data");
    write_download(&input_dir, DEFAULT_ROWS, true);

    let output_dir = temp_dir.path().join("output");
    let config = PipelineConfig::default()
        .with_input_dir(&input_dir)
        .with_output_dir(&output_dir)
        .with_encoding(crate::config::SourceEncoding::Utf8);

    (output_dir, config)
}
