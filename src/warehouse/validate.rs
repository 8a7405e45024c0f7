use rusqlite::Connection;
use tracing::{info, instrument, warn};

use crate::error::EtlResult;

/// Post-load row counts and integrity findings.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct WarehouseReport {
    pub games: i64,
    pub facts: i64,
    pub platforms: i64,
    pub genres: i64,
    pub publishers: i64,
    pub time_periods: i64,
    pub total_global_sales: f64,
    /// Facts whose game key has no `game_dim` row.
    pub orphaned_facts: i64,
}

impl WarehouseReport {
    pub fn passed(&self) -> bool {
        self.orphaned_facts == 0
    }
}

fn scalar<T: rusqlite::types::FromSql>(conn: &Connection, sql: &str) -> EtlResult<T> {
    Ok(conn.query_row(sql, [], |row| row.get(0))?)
}

/// Counts every table and looks for orphaned facts. Reports only; the caller
/// decides what a failure means for the surrounding transaction.
#[instrument(skip_all)]
pub fn validate(conn: &Connection) -> EtlResult<WarehouseReport> {
    info!("validating data warehouse");
    let report = WarehouseReport {
        games: scalar(conn, "SELECT COUNT(*) FROM game_dim")?,
        facts: scalar(conn, "SELECT COUNT(*) FROM game_sales_fact")?,
        platforms: scalar(conn, "SELECT COUNT(*) FROM platform_dim")?,
        genres: scalar(conn, "SELECT COUNT(*) FROM genre_dim")?,
        publishers: scalar(conn, "SELECT COUNT(*) FROM publisher_dim")?,
        time_periods: scalar(conn, "SELECT COUNT(*) FROM time_dim")?,
        total_global_sales: scalar(
            conn,
            "SELECT COALESCE(SUM(global_sales), 0.0) FROM game_sales_fact",
        )?,
        orphaned_facts: scalar(
            conn,
            "SELECT COUNT(*) FROM game_sales_fact fact \
             LEFT JOIN game_dim g ON fact.game_id = g.game_id \
             WHERE g.game_id IS NULL",
        )?,
    };

    info!(
        games = report.games,
        facts = report.facts,
        platforms = report.platforms,
        genres = report.genres,
        publishers = report.publishers,
        time_periods = report.time_periods,
        total_global_sales = report.total_global_sales,
        "data warehouse summary"
    );
    if report.passed() {
        info!("data warehouse validation passed");
    } else {
        warn!(orphans = report.orphaned_facts, "found orphaned fact records");
    }
    Ok(report)
}
