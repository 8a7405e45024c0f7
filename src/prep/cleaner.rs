//! Row-level repair of the raw table.
//!
//! Rows without a usable Year are dropped; every other defect is defaulted.
use tracing::{info, instrument, warn};

use crate::dataset::record::{RawRecord, Sales, SalesRecord, SALES_COLUMNS};
use crate::dataset::Table;
use crate::normalization::platform::canonical_platform;

pub const UNKNOWN: &str = "Unknown";

/// What cleaning did, for logging and reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct CleaningStats {
    pub input_rows: usize,
    pub dropped_missing_year: usize,
    pub dropped_invalid_year: usize,
    pub publisher_filled: usize,
    /// Missing values replaced with 0, per sales column.
    pub sales_filled: [usize; 5],
    /// Present but non-numeric values replaced with 0, per sales column.
    pub sales_coerced: [usize; 5],
    pub output_rows: usize,
}

impl CleaningStats {
    pub fn dropped(&self) -> usize {
        self.dropped_missing_year + self.dropped_invalid_year
    }
}

/// Parses a numeric field; non-finite values count as unparsable.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Year as an integer, truncating fractional spellings such as `2006.0`.
pub fn parse_year(raw: &str) -> Option<i32> {
    let value = parse_number(raw)?.trunc();
    (value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX)).then_some(value as i32)
}

fn text_or_unknown(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}

fn clean_row(raw: &RawRecord, stats: &mut CleaningStats) -> Option<SalesRecord> {
    let Some(year_raw) = raw.year.as_deref() else {
        stats.dropped_missing_year += 1;
        return None;
    };

    if raw.publisher.is_none() {
        stats.publisher_filled += 1;
    }

    let mut sales = [0.0; 5];
    for (idx, field) in raw.sales_fields().into_iter().enumerate() {
        sales[idx] = match field {
            None => {
                stats.sales_filled[idx] += 1;
                0.0
            }
            Some(text) => parse_number(text).unwrap_or_else(|| {
                stats.sales_coerced[idx] += 1;
                0.0
            }),
        };
    }

    let Some(year) = parse_year(year_raw) else {
        stats.dropped_invalid_year += 1;
        return None;
    };

    let platform = text_or_unknown(raw.platform.as_deref());
    Some(SalesRecord {
        rank: raw
            .rank
            .as_deref()
            .and_then(parse_number)
            .map(|r| r.trunc() as i64),
        name: text_or_unknown(raw.name.as_deref()),
        platform: canonical_platform(&platform),
        year,
        genre: text_or_unknown(raw.genre.as_deref()),
        publisher: text_or_unknown(raw.publisher.as_deref()),
        sales: Sales::from_array(sales),
    })
}

/// Produces a cleaned copy of `raw`; the input table is not modified.
#[instrument(skip_all, fields(rows = raw.len()))]
pub fn clean(raw: &Table<RawRecord>) -> (Table<SalesRecord>, CleaningStats) {
    let mut stats = CleaningStats {
        input_rows: raw.len(),
        ..CleaningStats::default()
    };
    let cleaned = raw.filter_map(|row| clean_row(row, &mut stats));
    stats.output_rows = cleaned.len();

    if stats.dropped_missing_year > 0 {
        warn!(
            rows = stats.dropped_missing_year,
            "removed rows with missing Year values"
        );
    }
    if stats.dropped_invalid_year > 0 {
        warn!(
            rows = stats.dropped_invalid_year,
            "removed rows with non-numeric Year values"
        );
    }
    if stats.publisher_filled > 0 {
        info!(
            rows = stats.publisher_filled,
            "filled missing Publisher values with 'Unknown'"
        );
    }
    for (column, (filled, coerced)) in SALES_COLUMNS
        .iter()
        .zip(stats.sales_filled.iter().zip(stats.sales_coerced.iter()))
    {
        if *filled > 0 || *coerced > 0 {
            info!(
                column,
                missing = filled,
                non_numeric = coerced,
                "replaced sales values with 0"
            );
        }
    }
    info!(
        kept = stats.output_rows,
        removed = stats.dropped(),
        "data value cleaning complete"
    );

    (cleaned, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(year: Option<&str>, publisher: Option<&str>, sales: [Option<&str>; 5]) -> RawRecord {
        let s = |v: Option<&str>| v.map(str::to_string);
        RawRecord {
            rank: Some("1".into()),
            name: Some("  Super Mario Bros.  ".into()),
            platform: Some(" NES ".into()),
            year: s(year),
            genre: Some("Platform".into()),
            publisher: s(publisher),
            na_sales: s(sales[0]),
            eu_sales: s(sales[1]),
            jp_sales: s(sales[2]),
            other_sales: s(sales[3]),
            global_sales: s(sales[4]),
        }
    }

    const FULL: [Option<&str>; 5] = [Some("4"), Some("3"), Some("2"), Some("1"), Some("10")];

    #[test]
    fn drops_rows_without_usable_year() {
        let input = Table::new(vec![
            raw(None, Some("Nintendo"), FULL),
            raw(Some("unknown"), Some("Nintendo"), FULL),
            raw(Some("1985"), Some("Nintendo"), FULL),
        ]);
        let (table, stats) = clean(&input);
        assert_eq!(table.len(), 1);
        assert_eq!(stats.dropped_missing_year, 1);
        assert_eq!(stats.dropped_invalid_year, 1);
        assert_eq!(input.len(), 3);
    }

    #[test]
    fn fills_publisher_and_zeroes_bad_sales() {
        let input = Table::new(vec![raw(
            Some("2006.0"),
            None,
            [None, Some("abc"), Some(" 0.5 "), Some("inf"), Some("1.2")],
        )]);
        let (table, stats) = clean(&input);
        let row = &table.rows()[0];
        assert_eq!(row.year, 2006);
        assert_eq!(row.publisher, UNKNOWN);
        assert_eq!(row.sales.all(), [0.0, 0.0, 0.5, 0.0, 1.2]);
        assert_eq!(stats.publisher_filled, 1);
        assert_eq!(stats.sales_filled, [1, 0, 0, 0, 0]);
        assert_eq!(stats.sales_coerced, [0, 1, 0, 1, 0]);
    }

    #[test]
    fn trims_text_and_canonicalizes_platform() {
        let mut record = raw(Some("2001"), Some(" Sony "), FULL);
        record.platform = Some(" Sony Playstation 2 ".into());
        let (table, _) = clean(&Table::new(vec![record]));
        let row = &table.rows()[0];
        assert_eq!(row.name, "Super Mario Bros.");
        assert_eq!(row.platform, "PS");
        assert_eq!(row.publisher, "Sony");
        assert_eq!(row.rank, Some(1));
    }

    #[test]
    fn keeps_negative_sales_for_the_quality_gate() {
        let (table, _) = clean(&Table::new(vec![raw(
            Some("1999"),
            Some("Acme"),
            [Some("-1"), Some("0"), Some("0"), Some("0"), Some("-1")],
        )]));
        assert_eq!(table.rows()[0].sales.na, -1.0);
    }

    #[test]
    fn parse_year_rejects_non_finite() {
        assert_eq!(parse_year("1994"), Some(1994));
        assert_eq!(parse_year("1994.7"), Some(1994));
        assert_eq!(parse_year("NaN"), None);
        assert_eq!(parse_year("inf"), None);
        assert_eq!(parse_year(""), None);
    }
}
