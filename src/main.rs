use anyhow::{Context, Result};
use clap::Parser;
use fao_price_processor::cli::{Args, setup_logging};
use fao_price_processor::processor::{PriceProcessor, RunReport};
use std::process;

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    match run(args) {
        Ok(_report) => {
            // Summary already printed by the processor
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<RunReport> {
    let show_progress = args.show_progress();
    let config = args.into_config().context("Failed to build configuration")?;
    let input_dir = config.input_dir.clone();

    let processor = PriceProcessor::new(config)?.with_progress(show_progress);
    let report = processor
        .run()
        .with_context(|| format!("Processing {} failed", input_dir.display()))?;

    Ok(report)
}
