//! Pipeline driver.
//!
//! Sequences the stages of a run: input discovery, source loading, reference
//! validation, reshape, cleaning, enrichment, aggregation and CSV export.
//! Progress is printed to stdout; diagnostics go through `tracing`.

pub mod discovery;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::{discovery::InputDiscovery, discovery::SourcePaths, writer::TableWriter};

use crate::aggregate::aggregate;
use crate::clean::clean;
use crate::config::PipelineConfig;
use crate::constants::columns;
use crate::enrich::Enricher;
use crate::error::Result;
use crate::models::{CleaningStats, EnrichmentStats, ReshapeStats, WrittenTable};
use crate::reshape::Reshaper;
use crate::source::{ReferenceTable, read_table};
use crate::validation::{ReferenceValidator, ValidationReport};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::DataFrame;
use std::time::{Duration, Instant};
use tracing::info;

/// Everything a run reports
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub validation: ValidationReport,
    /// Absent in validate-only runs
    pub reshape: Option<ReshapeStats>,
    pub cleaning: Option<CleaningStats>,
    pub enrichment: Option<EnrichmentStats>,
    pub tables: Vec<WrittenTable>,
    pub processing_time_ms: u128,
}

/// Loaded inputs of a run
#[derive(Debug)]
pub struct LoadedSources {
    pub primary: DataFrame,
    pub areas: ReferenceTable,
    pub items: ReferenceTable,
    pub elements: ReferenceTable,
    pub flags: Option<ReferenceTable>,
}

/// Runs the price pipeline for one configuration
#[derive(Debug)]
pub struct PriceProcessor {
    config: PipelineConfig,
    show_progress: bool,
}

impl PriceProcessor {
    /// Create a processor; the configuration is validated up front
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            show_progress: false,
        })
    }

    /// Show spinners and stage headers on stdout
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Main processing entry point
    pub fn run(&self) -> Result<RunReport> {
        let start_time = Instant::now();
        self.header("Starting FAOSTAT price processing");
        self.detail("Input:", self.config.input_dir.display());
        self.detail("Element:", &self.config.element_code);

        // Step 1: locate and load inputs
        self.stage("Loading sources...");
        let paths = InputDiscovery::new(self.config.input_dir.clone(), self.config.files.clone())
            .resolve()?;
        let sources = self.with_spinner("Reading CSV files", || self.load(&paths))?;
        self.detail(
            "Primary rows:",
            sources.primary.height().to_string().bright_white().bold(),
        );

        // Step 2: reference validation, never fatal on mismatch
        self.stage("Validating reference tables...");
        let validation = ReferenceValidator::new(
            &sources.areas,
            &sources.items,
            &sources.elements,
            sources.flags.as_ref(),
        )
        .validate(&sources.primary)?;
        self.print_validation(&validation);

        if self.config.validate_only {
            self.header("Validation only - no tables written");
            return Ok(RunReport {
                validation,
                processing_time_ms: start_time.elapsed().as_millis(),
                ..Default::default()
            });
        }

        // Step 3: element filter and wide-to-long
        self.stage("Reshaping...");
        let reshaper = Reshaper::new(self.config.element_code.clone())?;
        let (raw, reshape_stats) = reshaper.reshape(&sources.primary)?;
        drop(sources);
        self.detail(
            "Long rows:",
            reshape_stats.long_rows.to_string().bright_white(),
        );

        // Step 4: cleaning
        let (observations, cleaning_stats) = clean(raw);
        self.detail(
            "Clean rows:",
            format!(
                "{} ({} missing removed)",
                cleaning_stats.rows_after.to_string().bright_white(),
                cleaning_stats.rows_removed()
            ),
        );

        // Step 5: enrichment and aggregation
        self.stage("Computing metrics...");
        let enricher = Enricher::from_config(&self.config)?;
        let (enriched, enrichment_stats) = enricher.enrich(observations);
        let tables = self.with_spinner("Aggregating", || Ok(aggregate(enriched)))?;

        // Step 6: export
        self.stage("Writing tables...");
        let written = TableWriter::new(self.config.output_dir.clone()).write_all(&tables)?;
        for table in &written {
            self.detail(
                "Wrote",
                format!("{} ({} rows)", table.path.display(), table.rows),
            );
        }

        let report = RunReport {
            validation,
            reshape: Some(reshape_stats),
            cleaning: Some(cleaning_stats),
            enrichment: Some(enrichment_stats),
            tables: written,
            processing_time_ms: start_time.elapsed().as_millis(),
        };
        self.print_summary(&report);
        info!("Run finished in {}ms", report.processing_time_ms);

        Ok(report)
    }

    /// Read the primary dataset and every reference table
    pub fn load(&self, paths: &SourcePaths) -> Result<LoadedSources> {
        let encoding = self.config.encoding;

        let primary = read_table(&paths.data, encoding)?;
        let areas = ReferenceTable::from_frame(
            "areas",
            &read_table(&paths.area_codes, encoding)?,
            columns::AREA_CODE,
            columns::AREA,
            Some(columns::M49_CODE),
        )?;
        let items = ReferenceTable::from_frame(
            "items",
            &read_table(&paths.item_codes, encoding)?,
            columns::ITEM_CODE,
            columns::ITEM,
            None,
        )?;
        let elements = ReferenceTable::from_frame(
            "elements",
            &read_table(&paths.elements, encoding)?,
            columns::ELEMENT_CODE,
            columns::ELEMENT,
            None,
        )?;
        let flags = match &paths.flags {
            Some(path) => Some(ReferenceTable::from_frame(
                "flags",
                &read_table(path, encoding)?,
                columns::FLAG,
                columns::DESCRIPTION,
                None,
            )?),
            None => None,
        };

        info!(
            "Loaded {} primary rows; {} areas, {} items, {} elements",
            primary.height(),
            areas.len(),
            items.len(),
            elements.len()
        );

        Ok(LoadedSources {
            primary,
            areas,
            items,
            elements,
            flags,
        })
    }

    fn with_spinner<T>(&self, message: &str, work: impl FnOnce() -> Result<T>) -> Result<T> {
        if !self.show_progress {
            return work();
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));

        let result = work();
        spinner.finish_and_clear();
        result
    }

    fn header(&self, text: &str) {
        if self.show_progress {
            println!("{}", text.bright_green().bold());
        }
    }

    fn stage(&self, text: &str) {
        if self.show_progress {
            println!("\n{}", text.bright_yellow());
        }
    }

    fn detail(&self, label: &str, value: impl std::fmt::Display) {
        if self.show_progress {
            println!("  {} {}", label.bright_cyan(), value);
        }
    }

    fn print_validation(&self, report: &ValidationReport) {
        for coverage in &report.coverage {
            let status = if coverage.is_complete() {
                "ok".bright_green()
            } else {
                format!("{} missing", coverage.missing_count()).bright_red()
            };
            self.detail(
                &format!("{}:", coverage.code_column),
                format!(
                    "{} used, {} listed, {}",
                    coverage.primary_codes, coverage.reference_codes, status
                ),
            );
        }
        self.detail(
            "Geocoded rows:",
            format!("{}/{}", report.geocoded_rows, report.total_rows),
        );
        for element in report.elements.iter().filter(|e| e.rows > 0) {
            self.detail(
                "Element",
                format!("{} {} ({} rows)", element.code, element.name, element.rows),
            );
        }
    }

    fn print_summary(&self, report: &RunReport) {
        if !self.show_progress {
            return;
        }

        println!("\n{}", "Processing Summary".bright_green().bold());
        println!(
            "  {} {}ms",
            "Time elapsed:".bright_cyan(),
            report.processing_time_ms.to_string().bright_white()
        );
        if let Some(cleaning) = &report.cleaning {
            println!(
                "  {} {} ({:.1}% missing)",
                "Observations:".bright_cyan(),
                cleaning.rows_after.to_string().bright_white().bold(),
                cleaning.missing_percentage()
            );
            if let (Some(min), Some(max)) = (cleaning.year_min, cleaning.year_max) {
                println!(
                    "  {} {}-{} ({} years with data)",
                    "Years:".bright_cyan(),
                    min,
                    max,
                    cleaning.years_with_data
                );
            }
        }
        if let Some(enrichment) = &report.enrichment {
            for (region, areas) in &enrichment.areas_per_region {
                println!("  {} {} areas", format!("{}:", region).bright_cyan(), areas);
            }
        }
        if report.validation.mismatch_count() > 0 {
            println!(
                "  {} {}",
                "Reference mismatches:".bright_red(),
                report.validation.mismatch_count().to_string().bright_red().bold()
            );
        }
        println!(
            "  {} {}",
            "Output:".bright_cyan(),
            self.config.output_dir.display()
        );
    }
}
