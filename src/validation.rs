//! Reference table validation.
//!
//! Cross-checks the codes used by the primary dataset against the auxiliary
//! code tables. Mismatches are diagnostics only: they are logged and counted
//! in the [`ValidationReport`], and processing always continues.

use crate::constants::{YEAR_FLAG_PATTERN, columns};
use crate::error::{PriceError, Result};
use crate::source::{ReferenceTable, string_values};
use polars::prelude::DataFrame;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Coverage of one primary code column by one reference table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeCoverage {
    pub table: String,
    pub code_column: String,
    /// Distinct codes used by the primary dataset
    pub primary_codes: usize,
    /// Distinct codes listed by the reference table
    pub reference_codes: usize,
    /// Primary codes absent from the reference table, sorted
    pub missing: Vec<String>,
}

impl CodeCoverage {
    pub fn missing_count(&self) -> usize {
        self.missing.len()
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// How often an element of the element reference occurs in the primary dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementUsage {
    pub code: String,
    pub name: String,
    pub rows: usize,
}

/// Flag code and its description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagDescription {
    pub flag: String,
    pub description: String,
}

/// Side-channel report of the validation stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub coverage: Vec<CodeCoverage>,
    pub total_rows: usize,
    /// Primary rows whose area carries a geographic (M49) code
    pub geocoded_rows: usize,
    pub elements: Vec<ElementUsage>,
    pub flags: Vec<FlagDescription>,
}

impl ValidationReport {
    /// Total primary codes missing across all reference tables
    pub fn mismatch_count(&self) -> usize {
        self.coverage.iter().map(CodeCoverage::missing_count).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.mismatch_count() == 0
    }
}

/// Compare the distinct codes of a primary column against a reference table
pub fn check_codes<'a>(
    primary_codes: impl IntoIterator<Item = Option<&'a str>>,
    reference: &ReferenceTable,
) -> CodeCoverage {
    let used: BTreeSet<&str> = primary_codes
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();

    let missing: Vec<String> = used
        .iter()
        .filter(|code| !reference.contains(code))
        .map(|code| code.to_string())
        .collect();

    CodeCoverage {
        table: reference.label.clone(),
        code_column: reference.code_column.clone(),
        primary_codes: used.len(),
        reference_codes: reference.len(),
        missing,
    }
}

/// Validates the primary dataset against the auxiliary code tables
#[derive(Debug)]
pub struct ReferenceValidator<'a> {
    areas: &'a ReferenceTable,
    items: &'a ReferenceTable,
    elements: &'a ReferenceTable,
    flags: Option<&'a ReferenceTable>,
}

impl<'a> ReferenceValidator<'a> {
    pub fn new(
        areas: &'a ReferenceTable,
        items: &'a ReferenceTable,
        elements: &'a ReferenceTable,
        flags: Option<&'a ReferenceTable>,
    ) -> Self {
        Self {
            areas,
            items,
            elements,
            flags,
        }
    }

    /// Build the validation report; never fails on mismatching codes
    pub fn validate(&self, primary: &DataFrame) -> Result<ValidationReport> {
        let area_codes = string_values(primary, columns::AREA_CODE, "validation")?;
        let item_codes = string_values(primary, columns::ITEM_CODE, "validation")?;
        let element_codes = string_values(primary, columns::ELEMENT_CODE, "validation")?;

        let mut coverage = vec![
            check_codes(area_codes.iter().copied(), self.areas),
            check_codes(item_codes.iter().copied(), self.items),
            check_codes(element_codes.iter().copied(), self.elements),
        ];
        if let Some(flags) = self.flags {
            coverage.push(self.flag_coverage(primary, flags)?);
        }

        for check in &coverage {
            if check.is_complete() {
                debug!(
                    "{} codes covered: {} used, {} listed",
                    check.table, check.primary_codes, check.reference_codes
                );
            } else {
                warn!(
                    "{} of {} {} codes missing from the {} table: {:?}",
                    check.missing_count(),
                    check.primary_codes,
                    check.code_column,
                    check.table,
                    check.missing
                );
            }
        }

        let geocoded_rows = area_codes
            .iter()
            .flatten()
            .filter(|code| {
                self.areas
                    .get(code.trim())
                    .is_some_and(|entry| entry.attribute.is_some())
            })
            .count();

        Ok(ValidationReport {
            coverage,
            total_rows: primary.height(),
            geocoded_rows,
            elements: self.element_usage(&element_codes),
            flags: self.flag_descriptions(),
        })
    }

    /// Codes of every `Y<year>F` column against the flag table
    fn flag_coverage(&self, primary: &DataFrame, flags: &ReferenceTable) -> Result<CodeCoverage> {
        let pattern = Regex::new(YEAR_FLAG_PATTERN)
            .map_err(|e| PriceError::configuration(format!("invalid flag column pattern: {}", e)))?;

        let mut codes: Vec<Option<&str>> = Vec::new();
        for name in primary.get_column_names() {
            if pattern.is_match(name.as_str()) {
                codes.extend(string_values(primary, name.as_str(), "validation")?);
            }
        }

        Ok(check_codes(codes, flags))
    }

    fn element_usage(&self, element_codes: &[Option<&str>]) -> Vec<ElementUsage> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for code in element_codes.iter().flatten() {
            *counts.entry(code.trim()).or_insert(0) += 1;
        }

        self.elements
            .entries()
            .map(|(code, entry)| ElementUsage {
                code: code.to_string(),
                name: entry.name.clone().unwrap_or_default(),
                rows: counts.get(code).copied().unwrap_or(0),
            })
            .collect()
    }

    fn flag_descriptions(&self) -> Vec<FlagDescription> {
        self.flags
            .map(|flags| {
                flags
                    .entries()
                    .map(|(flag, entry)| FlagDescription {
                        flag: flag.to_string(),
                        description: entry.name.clone().unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
