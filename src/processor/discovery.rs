//! Input file discovery for FAOSTAT bulk downloads
//!
//! A bulk download unpacks into one directory holding the primary dataset and
//! its reference tables, named after the dataset, e.g.
//! ```text
//! Prices_E_All_Data/
//!   Prices_E_All_Data.csv
//!   Prices_E_AreaCodes.csv
//!   Prices_E_ItemCodes.csv
//!   Prices_E_Elements.csv
//!   Prices_E_Flags.csv
//! ```
//! Files are located by suffix pattern unless the configuration names them
//! explicitly.

use crate::config::SourceFiles;
use crate::constants::source_patterns;
use crate::error::{PriceError, Result};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Resolved locations of every input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub data: PathBuf,
    pub area_codes: PathBuf,
    pub item_codes: PathBuf,
    pub elements: PathBuf,
    /// The flag table is informational and may be absent
    pub flags: Option<PathBuf>,
}

/// Locates input files in the input directory
#[derive(Debug)]
pub struct InputDiscovery {
    input_dir: PathBuf,
    overrides: SourceFiles,
}

impl InputDiscovery {
    pub fn new(input_dir: PathBuf, overrides: SourceFiles) -> Self {
        Self {
            input_dir,
            overrides,
        }
    }

    /// Resolve all inputs; a missing required file is a source error
    pub fn resolve(&self) -> Result<SourcePaths> {
        let paths = SourcePaths {
            data: self.required(&self.overrides.data, source_patterns::DATA)?,
            area_codes: self.required(&self.overrides.area_codes, source_patterns::AREA_CODES)?,
            item_codes: self.required(&self.overrides.item_codes, source_patterns::ITEM_CODES)?,
            elements: self.required(&self.overrides.elements, source_patterns::ELEMENTS)?,
            flags: match &self.overrides.flags {
                Some(path) => Some(path.clone()),
                None => self.find(source_patterns::FLAGS)?,
            },
        };

        if paths.flags.is_none() {
            warn!(
                "No flag table ({}) in {}; flag descriptions will not be reported",
                source_patterns::FLAGS,
                self.input_dir.display()
            );
        }

        debug!("Resolved inputs: {:?}", paths);
        Ok(paths)
    }

    fn required(&self, explicit: &Option<PathBuf>, pattern: &str) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.clone());
        }
        self.find(pattern)?.ok_or_else(|| {
            PriceError::source_read(
                self.input_dir.join(pattern),
                "no matching file in the input directory",
            )
        })
    }

    /// First match of a pattern inside the input directory, in sorted order
    fn find(&self, pattern: &str) -> Result<Option<PathBuf>> {
        let full_pattern = self.input_dir.join(pattern);
        let full_pattern = full_pattern.to_string_lossy();

        let mut matches: Vec<PathBuf> = glob::glob(&full_pattern)
            .map_err(|e| {
                PriceError::configuration(format!("invalid input pattern {}: {}", full_pattern, e))
            })?
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file())
            .collect();
        matches.sort();

        if matches.len() > 1 {
            warn!(
                "{} files match {}, using {}",
                matches.len(),
                pattern,
                matches[0].display()
            );
        }

        Ok(matches.into_iter().next())
    }
}
