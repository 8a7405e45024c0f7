use anyhow::{Context, Result};
use tracing::error;

use crate::config::EtlConfig;
use crate::prep::{self, PrepareOutcome};

/// Runs pipeline 1 and prints the dataset summary as JSON on stdout.
pub fn run(cfg: &EtlConfig) -> Result<PrepareOutcome> {
    let outcome = prep::run(cfg).map_err(|e| {
        error!(error = %e, "data preparation pipeline failed");
        e
    })?;

    let json = serde_json::to_string_pretty(&outcome.summary)
        .context("failed to serialize dataset summary")?;
    println!("{json}");
    println!(
        "prepared {} rows -> {}",
        outcome.summary.total_games,
        outcome.output.display()
    );
    Ok(outcome)
}
