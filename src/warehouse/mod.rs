//! Pipeline 2: cleaned file → SQLite star schema, in one transaction.
pub mod dimensions;
pub mod facts;
pub mod games;
pub mod schema;
pub mod validate;

use std::path::PathBuf;

use rusqlite::Connection;
use tracing::{info, instrument, warn};

use crate::config::EtlConfig;
use crate::dataset::{source, PreparedRecord, Table};
use crate::error::EtlResult;

pub use dimensions::{DimensionBuilder, DimensionKeys};
pub use facts::{FactBuilder, FactLoadReport};
pub use validate::WarehouseReport;

#[derive(Debug, Clone, serde::Serialize)]
pub struct LoadOutcome {
    pub warehouse: PathBuf,
    pub source_rows: usize,
    pub facts: FactLoadReport,
    pub report: WarehouseReport,
}

/// Loads `table` into the warehouse behind `conn`.
///
/// Everything happens in one transaction: on any error it is dropped, which
/// rolls the store back to its state before the call.
pub fn load_table(
    conn: &mut Connection,
    table: &Table<PreparedRecord>,
    batch_size: usize,
) -> EtlResult<(FactLoadReport, WarehouseReport)> {
    let tx = conn.transaction()?;

    schema::create_dimension_tables(&tx)?;
    schema::create_fact_table(&tx)?;

    let mut dimensions = DimensionBuilder::new();
    dimensions.load(&tx, table)?;
    let facts = FactBuilder::new(dimensions.keys(), batch_size).load(&tx, table)?;

    schema::create_indexes(&tx)?;
    let report = validate::validate(&tx)?;
    if !report.passed() {
        warn!("warehouse validation failed; committing load as-is");
    }

    tx.commit()?;
    Ok((facts, report))
}

/// Reads the cleaned file and loads it into the configured warehouse.
#[instrument(
    skip_all,
    fields(
        source = %cfg.prepared_csv.display(),
        warehouse = %cfg.warehouse_path.display()
    )
)]
pub fn run(cfg: &EtlConfig) -> EtlResult<LoadOutcome> {
    info!("starting ETL pipeline to data warehouse");

    let table = source::read_prepared(&cfg.prepared_csv)?;
    let mut conn = schema::open(&cfg.warehouse_path)?;
    let (facts, report) = load_table(&mut conn, &table, cfg.fact_batch_size)?;

    info!("ETL pipeline completed");
    Ok(LoadOutcome {
        warehouse: cfg.warehouse_path.clone(),
        source_rows: table.len(),
        facts,
        report,
    })
}
