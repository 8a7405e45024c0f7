use anyhow::{Context, Result};
use tracing::error;

use crate::config::EtlConfig;
use crate::warehouse::{self, LoadOutcome};

/// Runs pipeline 2 and prints the warehouse report as JSON on stdout.
pub fn run(cfg: &EtlConfig) -> Result<LoadOutcome> {
    let outcome = warehouse::run(cfg).map_err(|e| {
        error!(error = %e, "ETL to data warehouse failed");
        e
    })?;

    let json = serde_json::to_string_pretty(&outcome.report)
        .context("failed to serialize warehouse report")?;
    println!("{json}");
    println!(
        "loaded {} new fact rows from {} source rows -> {}",
        outcome.facts.inserted,
        outcome.source_rows,
        outcome.warehouse.display()
    );
    Ok(outcome)
}
