use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::dataset::record::PreparedRecord;
use crate::dataset::Table;

/// Headline figures for a prepared dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSummary {
    pub total_games: usize,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub total_platforms: usize,
    pub total_publishers: usize,
    pub total_genres: usize,
    pub total_global_sales: f64,
    pub avg_sales_per_game: f64,
    pub top_genre: Option<String>,
    pub top_platform: Option<String>,
    pub top_publisher: Option<String>,
    pub generated_at: DateTime<Utc>,
}

fn distinct(table: &Table<PreparedRecord>, key: fn(&PreparedRecord) -> &str) -> usize {
    table.iter().map(key).collect::<BTreeSet<_>>().len()
}

/// Group with the largest summed Global sales; ties go to the smallest name.
fn top_by_global_sales(
    table: &Table<PreparedRecord>,
    key: fn(&PreparedRecord) -> &str,
) -> Option<String> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for row in table {
        *totals.entry(key(row)).or_default() += row.global_sales;
    }
    let mut best: Option<(&str, f64)> = None;
    for (name, total) in totals {
        if best.map_or(true, |(_, top)| total > top) {
            best = Some((name, total));
        }
    }
    best.map(|(name, _)| name.to_string())
}

pub fn summarize(table: &Table<PreparedRecord>) -> DataSummary {
    let total_global_sales: f64 = table.iter().map(|r| r.global_sales).sum();
    let avg_sales_per_game = if table.is_empty() {
        0.0
    } else {
        total_global_sales / table.len() as f64
    };

    DataSummary {
        total_games: table.len(),
        first_year: table.iter().map(|r| r.year).min(),
        last_year: table.iter().map(|r| r.year).max(),
        total_platforms: distinct(table, |r| r.platform.as_str()),
        total_publishers: distinct(table, |r| r.publisher.as_str()),
        total_genres: distinct(table, |r| r.genre.as_str()),
        total_global_sales,
        avg_sales_per_game,
        top_genre: top_by_global_sales(table, |r| r.genre.as_str()),
        top_platform: top_by_global_sales(table, |r| r.platform.as_str()),
        top_publisher: top_by_global_sales(table, |r| r.publisher.as_str()),
        generated_at: Utc::now(),
    }
}

impl DataSummary {
    pub fn log(&self) {
        info!(
            total_games = self.total_games,
            first_year = ?self.first_year,
            last_year = ?self.last_year,
            platforms = self.total_platforms,
            publishers = self.total_publishers,
            genres = self.total_genres,
            total_global_sales = self.total_global_sales,
            avg_sales_per_game = self.avg_sales_per_game,
            top_genre = ?self.top_genre,
            top_platform = ?self.top_platform,
            top_publisher = ?self.top_publisher,
            "dataset summary"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::record::{Sales, SalesRecord};
    use crate::prep::features::derive_row;

    fn row(platform: &str, genre: &str, year: i32, global: f64) -> PreparedRecord {
        derive_row(&SalesRecord {
            rank: None,
            name: format!("{platform}-{genre}"),
            platform: platform.into(),
            year,
            genre: genre.into(),
            publisher: "Nintendo".into(),
            sales: Sales::from_array([global, 0.0, 0.0, 0.0, global]),
        })
    }

    #[test]
    fn summarizes_groups_and_ranges() {
        let table = Table::new(vec![
            row("Wii", "Sports", 2006, 8.0),
            row("DS", "Puzzle", 2004, 3.0),
            row("DS", "Sports", 2009, 3.0),
        ]);
        let summary = summarize(&table);
        assert_eq!(summary.total_games, 3);
        assert_eq!((summary.first_year, summary.last_year), (Some(2004), Some(2009)));
        assert_eq!(summary.total_platforms, 2);
        assert_eq!(summary.total_genres, 2);
        assert_eq!(summary.total_publishers, 1);
        assert_eq!(summary.top_genre.as_deref(), Some("Sports"));
        assert_eq!(summary.top_platform.as_deref(), Some("Wii"));
        assert!((summary.avg_sales_per_game - 14.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn ties_resolve_to_smallest_name() {
        let table = Table::new(vec![row("Wii", "A", 2006, 2.0), row("DS", "B", 2006, 2.0)]);
        assert_eq!(summarize(&table).top_platform.as_deref(), Some("DS"));
    }

    #[test]
    fn empty_table_summary() {
        let summary = summarize(&Table::default());
        assert_eq!(summary.total_games, 0);
        assert_eq!(summary.avg_sales_per_game, 0.0);
        assert_eq!(summary.top_genre, None);
    }
}
