//! Pre-export consistency checks. Findings are reported, never enforced.
use std::collections::HashSet;

use tracing::{error, info, instrument, warn};

use crate::dataset::record::{Era, PreparedRecord, SuccessCategory};
use crate::dataset::Table;

/// Allowed absolute gap between Global sales and the sum of the regions.
pub const TOTALS_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct QualityReport {
    pub rows_checked: usize,
    /// Rows carrying at least one negative sales measure.
    pub negative_sales_rows: usize,
    /// Rows identical to an earlier row.
    pub duplicate_rows: usize,
    /// Rows whose Global sales differ from the regional sum by more than the tolerance.
    pub inconsistent_totals: usize,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
}

impl QualityReport {
    /// Only negative sales fail the gate; duplicates and totals are warnings.
    pub fn passed(&self) -> bool {
        self.negative_sales_rows == 0
    }
}

/// Hashable image of a row; floats are compared by bit pattern.
#[derive(PartialEq, Eq, Hash)]
struct RowImage<'a> {
    rank: Option<i64>,
    text: [&'a str; 4],
    year: i32,
    decade: i32,
    era: Era,
    measures: [u64; 9],
    success_category: SuccessCategory,
    multi_region_success: bool,
}

fn bits(value: f64) -> u64 {
    // -0.0 and 0.0 compare equal as values, so they must hash alike.
    (value + 0.0).to_bits()
}

impl<'a> RowImage<'a> {
    fn of(row: &'a PreparedRecord) -> Self {
        let [na, eu, jp, other, global] = row.sales().all();
        let [na_pct, eu_pct, jp_pct, other_pct] = row.shares();
        Self {
            rank: row.rank,
            text: [
                row.name.as_str(),
                row.platform.as_str(),
                row.genre.as_str(),
                row.publisher.as_str(),
            ],
            year: row.year,
            decade: row.decade,
            era: row.era,
            measures: [
                na, eu, jp, other, global, na_pct, eu_pct, jp_pct, other_pct,
            ]
            .map(bits),
            success_category: row.success_category,
            multi_region_success: row.multi_region_success,
        }
    }
}

pub fn has_negative_sales(row: &PreparedRecord) -> bool {
    row.sales().all().iter().any(|v| *v < 0.0)
}

pub fn totals_consistent(row: &PreparedRecord) -> bool {
    let sales = row.sales();
    let regional: f64 = sales.regional().iter().sum();
    (sales.global - regional).abs() <= TOTALS_TOLERANCE
}

/// Runs every check over `table` and logs the findings.
#[instrument(skip_all, fields(rows = table.len()))]
pub fn inspect(table: &Table<PreparedRecord>) -> QualityReport {
    let mut report = QualityReport {
        rows_checked: table.len(),
        ..QualityReport::default()
    };
    let mut seen = HashSet::with_capacity(table.len());

    for row in table {
        if has_negative_sales(row) {
            report.negative_sales_rows += 1;
        }
        if !seen.insert(RowImage::of(row)) {
            report.duplicate_rows += 1;
        }
        if !totals_consistent(row) {
            report.inconsistent_totals += 1;
        }
        report.min_year = Some(report.min_year.map_or(row.year, |y| y.min(row.year)));
        report.max_year = Some(report.max_year.map_or(row.year, |y| y.max(row.year)));
    }

    if report.negative_sales_rows > 0 {
        error!(rows = report.negative_sales_rows, "negative sales values found");
    }
    if report.duplicate_rows > 0 {
        warn!(
            rows = report.duplicate_rows,
            "duplicate records found; keeping them for analysis"
        );
    }
    if report.inconsistent_totals > 0 {
        warn!(
            rows = report.inconsistent_totals,
            tolerance = TOTALS_TOLERANCE,
            "records with inconsistent global/regional sales totals"
        );
    }
    if let (Some(min), Some(max)) = (report.min_year, report.max_year) {
        info!(min_year = min, max_year = max, "data year coverage");
    }

    if report.passed() {
        info!("all quality checks passed");
    } else {
        warn!("some quality checks failed; export continues");
    }
    report
}
