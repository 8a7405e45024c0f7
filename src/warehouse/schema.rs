//! Star-schema DDL for the SQLite warehouse.
use std::fs;
use std::path::Path;

use rusqlite::Connection;
use tracing::{info, instrument};

use crate::error::EtlResult;

const DIMENSION_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS platform_dim (
    platform_id INTEGER PRIMARY KEY AUTOINCREMENT,
    platform_name TEXT UNIQUE NOT NULL,
    platform_category TEXT,
    created_date TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS genre_dim (
    genre_id INTEGER PRIMARY KEY AUTOINCREMENT,
    genre_name TEXT UNIQUE NOT NULL,
    created_date TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS publisher_dim (
    publisher_id INTEGER PRIMARY KEY AUTOINCREMENT,
    publisher_name TEXT UNIQUE NOT NULL,
    publisher_size_category TEXT,
    created_date TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);
-- time_id is the year itself
CREATE TABLE IF NOT EXISTS time_dim (
    time_id INTEGER PRIMARY KEY,
    year INTEGER NOT NULL,
    decade INTEGER NOT NULL,
    era TEXT NOT NULL,
    created_date TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS game_dim (
    game_id INTEGER PRIMARY KEY AUTOINCREMENT,
    game_name TEXT NOT NULL,
    platform_id INTEGER,
    genre_id INTEGER,
    publisher_id INTEGER,
    release_year INTEGER,
    success_category TEXT,
    multi_region_success BOOLEAN,
    created_date TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (platform_id) REFERENCES platform_dim (platform_id),
    FOREIGN KEY (genre_id) REFERENCES genre_dim (genre_id),
    FOREIGN KEY (publisher_id) REFERENCES publisher_dim (publisher_id)
);
"#;

const FACT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS game_sales_fact (
    fact_id INTEGER PRIMARY KEY AUTOINCREMENT,
    game_id INTEGER NOT NULL,
    platform_id INTEGER NOT NULL,
    genre_id INTEGER NOT NULL,
    publisher_id INTEGER NOT NULL,
    time_id INTEGER NOT NULL,
    global_sales REAL NOT NULL,
    na_sales REAL NOT NULL,
    eu_sales REAL NOT NULL,
    jp_sales REAL NOT NULL,
    other_sales REAL NOT NULL,
    na_sales_pct REAL,
    eu_sales_pct REAL,
    jp_sales_pct REAL,
    other_sales_pct REAL,
    created_date TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (game_id) REFERENCES game_dim (game_id),
    FOREIGN KEY (platform_id) REFERENCES platform_dim (platform_id),
    FOREIGN KEY (genre_id) REFERENCES genre_dim (genre_id),
    FOREIGN KEY (publisher_id) REFERENCES publisher_dim (publisher_id),
    FOREIGN KEY (time_id) REFERENCES time_dim (time_id),
    UNIQUE (game_id, platform_id, genre_id, publisher_id, time_id)
);
"#;

const INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_fact_game ON game_sales_fact(game_id);
CREATE INDEX IF NOT EXISTS idx_fact_platform ON game_sales_fact(platform_id);
CREATE INDEX IF NOT EXISTS idx_fact_genre ON game_sales_fact(genre_id);
CREATE INDEX IF NOT EXISTS idx_fact_publisher ON game_sales_fact(publisher_id);
CREATE INDEX IF NOT EXISTS idx_fact_time ON game_sales_fact(time_id);
CREATE INDEX IF NOT EXISTS idx_fact_global_sales ON game_sales_fact(global_sales);
CREATE INDEX IF NOT EXISTS idx_platform_name ON platform_dim(platform_name);
CREATE INDEX IF NOT EXISTS idx_genre_name ON genre_dim(genre_name);
CREATE INDEX IF NOT EXISTS idx_publisher_name ON publisher_dim(publisher_name);
CREATE INDEX IF NOT EXISTS idx_time_year ON time_dim(year);
CREATE INDEX IF NOT EXISTS idx_game_name ON game_dim(game_name);
"#;

/// Opens (creating if needed) the warehouse file with foreign keys enforced.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn open(path: &Path) -> EtlResult<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path)?;
    enforce_foreign_keys(&conn)?;
    info!("opened warehouse connection");
    Ok(conn)
}

/// Has no effect inside an open transaction, so call it right after connecting.
pub fn enforce_foreign_keys(conn: &Connection) -> EtlResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(())
}

pub fn create_dimension_tables(conn: &Connection) -> EtlResult<()> {
    conn.execute_batch(DIMENSION_TABLES)?;
    info!("dimension tables ready");
    Ok(())
}

pub fn create_fact_table(conn: &Connection) -> EtlResult<()> {
    conn.execute_batch(FACT_TABLE)?;
    info!("fact table ready");
    Ok(())
}

pub fn create_indexes(conn: &Connection) -> EtlResult<()> {
    conn.execute_batch(INDEXES)?;
    info!("indexes created");
    Ok(())
}

/// Whether `table` exists in the main schema.
#[cfg(test)]
pub(crate) fn table_exists(conn: &Connection, table: &str) -> EtlResult<bool> {
    let mut stmt = conn.prepare(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND lower(name) = lower(?) LIMIT 1",
    )?;
    let mut rows = stmt.query([table])?;
    Ok(rows.next()?.is_some())
}
