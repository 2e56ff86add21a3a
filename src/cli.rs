//! Command-line interface components.

use crate::config::{PipelineConfig, SourceEncoding};
use crate::error::{PriceError, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "fao_price_processor")]
#[command(about = "Turn FAOSTAT producer price bulk downloads into tidy CSV tables and summary metrics")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Directory holding the bulk download CSV files (defaults to the config file value or ".")
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: Option<PathBuf>,

    /// Output directory for the CSV tables
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Element code of the series to keep (5539 = Producer Price Index)
    #[arg(short, long)]
    pub element: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Input file encoding (latin1, utf8)
    #[arg(long)]
    pub encoding: Option<String>,

    /// Load and validate the inputs, then exit without writing tables
    #[arg(long)]
    pub validate_only: bool,

    /// Increase logging verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Whether to print stage headers and spinners
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Build the run configuration: defaults, then the TOML file, then flags
    pub fn into_config(self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_toml_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(input_dir) = self.input_dir {
            config = config.with_input_dir(input_dir);
        }
        if let Some(output) = self.output {
            config = config.with_output_dir(output);
        }
        if let Some(element) = self.element {
            config = config.with_element_code(element);
        }
        if let Some(name) = self.encoding {
            let encoding = SourceEncoding::from_name(&name).ok_or_else(|| {
                PriceError::configuration(format!(
                    "unknown encoding '{}' (expected latin1 or utf8)",
                    name
                ))
            })?;
            config = config.with_encoding(encoding);
        }
        if self.validate_only {
            config = config.with_validate_only();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fao_price_processor={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}
