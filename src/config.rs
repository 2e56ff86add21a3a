//! Configuration management and validation.
//!
//! [`PipelineConfig`] is the single value threaded through every pipeline
//! stage: where the inputs live, how they are encoded, which element series
//! to keep, where the tables are written, and the two lookup tables used for
//! enrichment. Defaults reproduce the standard FAOSTAT producer price run; a
//! TOML file can override any field.

use crate::constants::{DEFAULT_ELEMENT_CODE, DEFAULT_OUTPUT_DIR};
use crate::error::{PriceError, Result};
use crate::lookup::{DEFAULT_CATEGORIES, DEFAULT_REGIONS, groups_from_table};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Character encoding shared by all input files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceEncoding {
    /// ISO-8859-1, used by the FAOSTAT bulk downloads
    #[default]
    Latin1,
    /// Strict UTF-8
    Utf8,
}

impl SourceEncoding {
    /// Parse an encoding name as given on the command line
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "latin1" | "iso88591" => Some(Self::Latin1),
            "utf8" => Some(Self::Utf8),
            _ => None,
        }
    }
}

/// One label and the exact names that map to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelGroup {
    pub label: String,
    #[serde(default)]
    pub members: Vec<String>,
}

/// Explicit input file locations, overriding discovery in the input directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceFiles {
    pub data: Option<PathBuf>,
    pub area_codes: Option<PathBuf>,
    pub item_codes: Option<PathBuf>,
    pub elements: Option<PathBuf>,
    pub flags: Option<PathBuf>,
}

/// Configuration for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding the bulk download CSV files
    pub input_dir: PathBuf,

    /// Directory the output tables are written to (created if absent)
    pub output_dir: PathBuf,

    /// Element code of the single series to keep
    pub element_code: String,

    /// Encoding of all input files
    pub encoding: SourceEncoding,

    /// Per-file overrides; unset entries are discovered in `input_dir`
    pub files: SourceFiles,

    /// Area name → region groups, in lookup priority order
    pub regions: Vec<LabelGroup>,

    /// Item name → product category groups, in lookup priority order
    pub categories: Vec<LabelGroup>,

    /// Load and validate the inputs, then stop without writing tables
    pub validate_only: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            element_code: DEFAULT_ELEMENT_CODE.to_string(),
            encoding: SourceEncoding::default(),
            files: SourceFiles::default(),
            regions: groups_from_table(DEFAULT_REGIONS),
            categories: groups_from_table(DEFAULT_CATEGORIES),
            validate_only: false,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file; missing fields keep their defaults
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PriceError::configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Set the input directory
    pub fn with_input_dir(mut self, input_dir: impl Into<PathBuf>) -> Self {
        self.input_dir = input_dir.into();
        self
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Set the element code to filter on
    pub fn with_element_code(mut self, element_code: impl Into<String>) -> Self {
        self.element_code = element_code.into();
        self
    }

    /// Set the input encoding
    pub fn with_encoding(mut self, encoding: SourceEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Replace the region lookup table
    pub fn with_regions(mut self, regions: Vec<LabelGroup>) -> Self {
        self.regions = regions;
        self
    }

    /// Replace the product category lookup table
    pub fn with_categories(mut self, categories: Vec<LabelGroup>) -> Self {
        self.categories = categories;
        self
    }

    /// Enable validate-only mode
    pub fn with_validate_only(mut self) -> Self {
        self.validate_only = true;
        self
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.element_code.trim().is_empty() {
            return Err(PriceError::configuration("element code must not be empty"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(PriceError::configuration("output directory must not be empty"));
        }
        for group in self.regions.iter().chain(self.categories.iter()) {
            if group.label.trim().is_empty() {
                return Err(PriceError::configuration("lookup group with empty label"));
            }
        }
        Ok(())
    }
}
