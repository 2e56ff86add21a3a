//! Application constants for the price processor
//!
//! Column names of the FAOSTAT bulk files, output file names, metric
//! thresholds and the default filter values used throughout the pipeline.

// =============================================================================
// Series selection
// =============================================================================

/// Element code of the Producer Price Index, the internationally comparable series
pub const DEFAULT_ELEMENT_CODE: &str = "5539";

/// Label assigned when an area or item is not listed in any lookup group
pub const OTHER_LABEL: &str = "Other";

// =============================================================================
// Metric parameters
// =============================================================================

/// First anchor year of the trend window
pub const TREND_START_YEAR: i32 = 2010;

/// Last anchor year of the trend window
pub const TREND_END_YEAR: i32 = 2023;

/// Minimum price observations before volatility is defined
pub const VOLATILITY_MIN_POINTS: usize = 5;

/// Minimum valid period-over-period changes before volatility is defined
pub const VOLATILITY_MIN_CHANGES: usize = 3;

/// Decimal places kept for summary metrics in exported tables
pub const EXPORT_DECIMALS: i32 = 2;

// =============================================================================
// Source columns
// =============================================================================

/// Column names of the FAOSTAT bulk download files
pub mod columns {
    pub const AREA_CODE: &str = "Area Code";
    pub const AREA: &str = "Area";
    pub const ITEM_CODE: &str = "Item Code";
    pub const ITEM: &str = "Item";
    pub const ELEMENT_CODE: &str = "Element Code";
    pub const ELEMENT: &str = "Element";
    pub const M49_CODE: &str = "M49 Code";
    pub const FLAG: &str = "Flag";
    pub const DESCRIPTION: &str = "Description";

    /// Identifier columns the primary dataset must carry
    pub const PRIMARY_ID_COLUMNS: &[&str] =
        &[AREA_CODE, AREA, ITEM_CODE, ITEM, ELEMENT_CODE, ELEMENT];
}

/// Pattern of a year-value column, e.g. `Y1991`
pub const YEAR_VALUE_PATTERN: &str = r"^Y(\d{4})$";

/// Pattern of a year-flag column, e.g. `Y1991F`
pub const YEAR_FLAG_PATTERN: &str = r"^Y(\d{4})F$";

// =============================================================================
// Input discovery
// =============================================================================

/// Glob patterns for the bulk download files inside the input directory
pub mod source_patterns {
    pub const DATA: &str = "*_All_Data.csv";
    pub const AREA_CODES: &str = "*_AreaCodes.csv";
    pub const ITEM_CODES: &str = "*_ItemCodes.csv";
    pub const ELEMENTS: &str = "*_Elements.csv";
    pub const FLAGS: &str = "*_Flags.csv";
}

// =============================================================================
// Output files
// =============================================================================

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// File names of the exported tables
pub mod output_files {
    pub const CLEAN_LONG: &str = "01_FAOSTAT_Prices_Clean_Long.csv";
    pub const COUNTRY_METRICS: &str = "02_Country_Metrics.csv";
    pub const PRODUCT_METRICS: &str = "03_Product_Metrics.csv";
    pub const REGIONAL_AGGREGATES: &str = "04_Regional_Aggregates.csv";
    pub const COUNTRY_CATEGORY_METRICS: &str = "05_Country_Category_Metrics.csv";
}
