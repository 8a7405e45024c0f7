//! Platform, genre, publisher and time dimensions.
//!
//! Dimension rows are insert-if-absent on their natural key; the builder
//! keeps the natural → surrogate mapping for the fact load.
use indexmap::{IndexMap, IndexSet};
use rusqlite::{params, Connection};
use tracing::{info, instrument};

use crate::dataset::{PreparedRecord, Table};
use crate::error::EtlResult;
use crate::prep::features::{decade, era};

/// A dimension keyed by a name column with a store-assigned surrogate key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedDimension {
    Platform,
    Genre,
    Publisher,
}

impl NamedDimension {
    fn insert_sql(self) -> &'static str {
        match self {
            NamedDimension::Platform => {
                "INSERT OR IGNORE INTO platform_dim (platform_name) VALUES (?1)"
            }
            NamedDimension::Genre => "INSERT OR IGNORE INTO genre_dim (genre_name) VALUES (?1)",
            NamedDimension::Publisher => {
                "INSERT OR IGNORE INTO publisher_dim (publisher_name) VALUES (?1)"
            }
        }
    }

    fn lookup_sql(self) -> &'static str {
        match self {
            NamedDimension::Platform => {
                "SELECT platform_id FROM platform_dim WHERE platform_name = ?1"
            }
            NamedDimension::Genre => "SELECT genre_id FROM genre_dim WHERE genre_name = ?1",
            NamedDimension::Publisher => {
                "SELECT publisher_id FROM publisher_dim WHERE publisher_name = ?1"
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NamedDimension::Platform => "platform",
            NamedDimension::Genre => "genre",
            NamedDimension::Publisher => "publisher",
        }
    }

    fn natural_key(self, row: &PreparedRecord) -> &str {
        match self {
            NamedDimension::Platform => &row.platform,
            NamedDimension::Genre => &row.genre,
            NamedDimension::Publisher => &row.publisher,
        }
    }
}

/// Natural key → surrogate key, per dimension, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionKeys {
    pub platform: IndexMap<String, i64>,
    pub genre: IndexMap<String, i64>,
    pub publisher: IndexMap<String, i64>,
    pub time: IndexMap<i32, i64>,
}

impl DimensionKeys {
    pub fn platform_id(&self, name: &str) -> Option<i64> {
        self.platform.get(name).copied()
    }

    pub fn genre_id(&self, name: &str) -> Option<i64> {
        self.genre.get(name).copied()
    }

    pub fn publisher_id(&self, name: &str) -> Option<i64> {
        self.publisher.get(name).copied()
    }

    pub fn time_id(&self, year: i32) -> Option<i64> {
        self.time.get(&year).copied()
    }

    fn named_mut(&mut self, dim: NamedDimension) -> &mut IndexMap<String, i64> {
        match dim {
            NamedDimension::Platform => &mut self.platform,
            NamedDimension::Genre => &mut self.genre,
            NamedDimension::Publisher => &mut self.publisher,
        }
    }
}

/// Inserts `name` unless present and returns its surrogate key.
pub fn ensure_named(conn: &Connection, dim: NamedDimension, name: &str) -> EtlResult<i64> {
    let inserted = conn.prepare_cached(dim.insert_sql())?.execute([name])?;
    if inserted > 0 {
        return Ok(conn.last_insert_rowid());
    }
    let id: i64 = conn
        .prepare_cached(dim.lookup_sql())?
        .query_row([name], |row| row.get(0))?;
    Ok(id)
}

/// Inserts the time row for `year` unless present. The key is the year itself.
pub fn ensure_year(conn: &Connection, year: i32) -> EtlResult<i64> {
    conn.prepare_cached(
        "INSERT OR IGNORE INTO time_dim (time_id, year, decade, era) VALUES (?1, ?1, ?2, ?3)",
    )?
    .execute(params![year, decade(year), era(year).label()])?;
    Ok(i64::from(year))
}

#[derive(Debug, Default)]
pub struct DimensionBuilder {
    keys: DimensionKeys,
}

impl DimensionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures every distinct dimension value of `table` is stored and mapped.
    #[instrument(skip_all, fields(rows = table.len()))]
    pub fn load(
        &mut self,
        conn: &Connection,
        table: &Table<PreparedRecord>,
    ) -> EtlResult<&DimensionKeys> {
        info!("loading dimension data");
        for dim in [
            NamedDimension::Platform,
            NamedDimension::Genre,
            NamedDimension::Publisher,
        ] {
            let names: IndexSet<&str> = table.iter().map(|row| dim.natural_key(row)).collect();
            for name in &names {
                let id = ensure_named(conn, dim, name)?;
                self.keys.named_mut(dim).insert((*name).to_string(), id);
            }
            info!(dimension = dim.label(), distinct = names.len(), "dimension loaded");
        }

        let years: IndexSet<i32> = table.iter().map(|row| row.year).collect();
        for year in &years {
            let id = ensure_year(conn, *year)?;
            self.keys.time.insert(*year, id);
        }
        info!(dimension = "time", distinct = years.len(), "dimension loaded");

        Ok(&self.keys)
    }

    pub fn keys(&self) -> &DimensionKeys {
        &self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::record::{Sales, SalesRecord};
    use crate::prep::features::derive_row;
    use crate::warehouse::schema;

    fn row(platform: &str, genre: &str, publisher: &str, year: i32) -> PreparedRecord {
        derive_row(&SalesRecord {
            rank: None,
            name: "Game".into(),
            platform: platform.into(),
            year,
            genre: genre.into(),
            publisher: publisher.into(),
            sales: Sales::from_array([1.0, 1.0, 0.0, 0.0, 2.0]),
        })
    }

    fn store() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::create_dimension_tables(&conn).unwrap();
        conn
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn assigns_keys_in_first_seen_order() {
        let conn = store();
        let table = Table::new(vec![
            row("Wii", "Sports", "Nintendo", 2006),
            row("DS", "Sports", "Nintendo", 2005),
            row("Wii", "Racing", "Nintendo", 2006),
        ]);
        let mut builder = DimensionBuilder::new();
        let keys = builder.load(&conn, &table).unwrap().clone();

        assert_eq!(keys.platform_id("Wii"), Some(1));
        assert_eq!(keys.platform_id("DS"), Some(2));
        assert_eq!(keys.genre_id("Racing"), Some(2));
        assert_eq!(keys.time_id(2006), Some(2006));
        assert_eq!(keys.time_id(1999), None);

        let era: String = conn
            .query_row("SELECT era FROM time_dim WHERE time_id = 2005", [], |r| r.get(0))
            .unwrap();
        assert_eq!(era, "2000s");
    }

    #[test]
    fn reloading_reuses_keys_without_duplicates() {
        let conn = store();
        let table = Table::new(vec![
            row("PS", "Action", "Sony", 1998),
            row("XB", "Shooter", "Microsoft", 2004),
        ]);
        let first = DimensionBuilder::new().load(&conn, &table).unwrap().clone();
        let second = DimensionBuilder::new().load(&conn, &table).unwrap().clone();

        assert_eq!(first, second);
        assert_eq!(count(&conn, "platform_dim"), 2);
        assert_eq!(count(&conn, "publisher_dim"), 2);
        assert_eq!(count(&conn, "time_dim"), 2);
    }

    #[test]
    fn existing_rows_are_looked_up() {
        let conn = store();
        conn.execute("INSERT INTO genre_dim (genre_name) VALUES ('Puzzle')", [])
            .unwrap();
        conn.execute("INSERT INTO genre_dim (genre_name) VALUES ('Action')", [])
            .unwrap();

        let table = Table::new(vec![row("GB", "Action", "Nintendo", 1989)]);
        let mut builder = DimensionBuilder::new();
        builder.load(&conn, &table).unwrap();
        assert_eq!(builder.keys().genre_id("Action"), Some(2));
        assert_eq!(count(&conn, "genre_dim"), 2);
    }
}
