//! Video-game sales preparation and star-schema warehouse loading.
//!
//! Two batch pipelines share the [`dataset::Table`] abstraction:
//! [`prep::run`] turns the raw sales file into a cleaned, feature-enriched
//! file, and [`warehouse::run`] loads that file into a SQLite star schema.
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod normalization;
pub mod prep;
pub mod tracing;
pub mod util;
pub mod warehouse;

pub use config::EtlConfig;
pub use error::{EtlError, EtlResult};
