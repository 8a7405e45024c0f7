use rusqlite::{params, Connection};
use tracing::{debug, info, instrument};

use super::dimensions::DimensionKeys;
use super::games::{GameCatalog, GameKey};
use crate::dataset::{PreparedRecord, Table};
use crate::error::EtlResult;

const INSERT_FACT: &str = "INSERT OR IGNORE INTO game_sales_fact (
    game_id, platform_id, genre_id, publisher_id, time_id,
    global_sales, na_sales, eu_sales, jp_sales, other_sales,
    na_sales_pct, eu_sales_pct, jp_sales_pct, other_sales_pct
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)";

#[derive(Debug, Clone, Copy, PartialEq)]
struct FactRow {
    game_id: i64,
    platform_id: i64,
    genre_id: i64,
    publisher_id: i64,
    time_id: i64,
    global_sales: f64,
    regional: [f64; 4],
    shares: [f64; 4],
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct FactLoadReport {
    /// Rows whose keys all resolved and were offered to the store.
    pub resolved: usize,
    /// Rows actually added; the rest matched an existing five-key composite.
    pub inserted: usize,
    pub distinct_games: usize,
    pub games_created: usize,
}

/// Loads fact rows against the keys produced by a `DimensionBuilder`.
pub struct FactBuilder<'k> {
    keys: &'k DimensionKeys,
    games: GameCatalog,
    batch_size: usize,
}

impl<'k> FactBuilder<'k> {
    pub fn new(keys: &'k DimensionKeys, batch_size: usize) -> Self {
        Self {
            keys,
            games: GameCatalog::new(),
            batch_size: batch_size.max(1),
        }
    }

    /// `None` when any dimension key is unknown; such rows are skipped quietly.
    fn resolve(&mut self, conn: &Connection, row: &PreparedRecord) -> EtlResult<Option<FactRow>> {
        let (Some(platform_id), Some(genre_id), Some(publisher_id), Some(time_id)) = (
            self.keys.platform_id(&row.platform),
            self.keys.genre_id(&row.genre),
            self.keys.publisher_id(&row.publisher),
            self.keys.time_id(row.year),
        ) else {
            return Ok(None);
        };

        let key = GameKey {
            name: row.name.clone(),
            platform_id,
            genre_id,
            publisher_id,
        };
        let game_id = self.games.resolve(conn, key, row)?;
        let sales = row.sales();
        Ok(Some(FactRow {
            game_id,
            platform_id,
            genre_id,
            publisher_id,
            time_id,
            global_sales: sales.global,
            regional: sales.regional(),
            shares: row.shares(),
        }))
    }

    /// Resolves every row and inserts the facts in batches.
    #[instrument(skip_all, fields(rows = table.len(), batch_size = self.batch_size))]
    pub fn load(
        mut self,
        conn: &Connection,
        table: &Table<PreparedRecord>,
    ) -> EtlResult<FactLoadReport> {
        info!("loading fact data");
        let mut report = FactLoadReport::default();
        let mut batch = Vec::with_capacity(self.batch_size);

        for row in table {
            let Some(fact) = self.resolve(conn, row)? else {
                continue;
            };
            report.resolved += 1;
            batch.push(fact);
            if batch.len() >= self.batch_size {
                report.inserted += flush(conn, &mut batch)?;
            }
        }
        report.inserted += flush(conn, &mut batch)?;

        report.distinct_games = self.games.len();
        report.games_created = self.games.created();
        info!(
            resolved = report.resolved,
            inserted = report.inserted,
            games = report.distinct_games,
            new_games = report.games_created,
            "fact load complete"
        );
        Ok(report)
    }
}

fn flush(conn: &Connection, batch: &mut Vec<FactRow>) -> EtlResult<usize> {
    if batch.is_empty() {
        return Ok(0);
    }
    let mut stmt = conn.prepare_cached(INSERT_FACT)?;
    let mut inserted = 0;
    for fact in batch.drain(..) {
        let [na, eu, jp, other] = fact.regional;
        let [na_pct, eu_pct, jp_pct, other_pct] = fact.shares;
        inserted += stmt.execute(params![
            fact.game_id,
            fact.platform_id,
            fact.genre_id,
            fact.publisher_id,
            fact.time_id,
            fact.global_sales,
            na,
            eu,
            jp,
            other,
            na_pct,
            eu_pct,
            jp_pct,
            other_pct,
        ])?;
    }
    debug!(inserted, "flushed fact batch");
    Ok(inserted)
}
