use std::fs;
use std::path::Path;

use csv::WriterBuilder;
use tracing::{info, instrument};

use super::record::{prepared_columns, PreparedRecord};
use super::table::Table;
use crate::error::EtlResult;

/// Writes the prepared table, header first, creating the parent directory if needed.
/// Returns the number of data rows written.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn write_prepared(path: &Path, table: &Table<PreparedRecord>) -> EtlResult<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    // Header is written by hand so an empty table still produces a readable file.
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(prepared_columns())?;
    for row in table {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(rows = table.len(), "exported cleaned dataset");
    Ok(table.len())
}
