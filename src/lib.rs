//! FAOSTAT Price Processor Library
//!
//! A Rust library for turning FAOSTAT producer price bulk downloads into tidy
//! long-form tables and summary metrics.
//!
//! This library provides tools for:
//! - Reading the bulk download CSV files in Latin-1 or UTF-8
//! - Cross-checking the primary dataset against its reference code tables
//! - Filtering one element series and reshaping year columns to long form
//! - Labelling observations with world regions and product categories
//! - Year-over-year change, volatility and 2010-2023 trend per group
//! - Writing country, product, regional and country-category tables as CSV

pub mod aggregate;
pub mod clean;
pub mod cli;
pub mod config;
pub mod constants;
pub mod enrich;
pub mod error;
pub mod lookup;
pub mod metrics;
pub mod models;
pub mod processor;
pub mod reshape;
pub mod source;
pub mod validation;

// Re-export commonly used types
pub use aggregate::AggregateTables;
pub use config::{LabelGroup, PipelineConfig, SourceEncoding};
pub use error::{PriceError, Result};
pub use models::{EnrichedObservation, Observation, SeriesSummary};
pub use processor::{PriceProcessor, RunReport};
