use tracing::{info, instrument};

use crate::dataset::record::{Era, PreparedRecord, SalesRecord, SuccessCategory};
use crate::dataset::Table;

/// Regional sales above this many millions count as significant (100k units).
pub const SIGNIFICANT_REGIONAL_SALES: f64 = 0.1;
/// Significant regions needed for a multi-region success.
pub const MULTI_REGION_MIN_REGIONS: usize = 2;

pub fn decade(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

pub fn era(year: i32) -> Era {
    match year {
        ..=1989 => Era::Pre1990,
        1990..=1999 => Era::Nineties,
        2000..=2009 => Era::TwoThousands,
        2010.. => Era::TwentyTensOnward,
    }
}

/// `part / total`, or 0 when the quotient is not a finite number.
pub fn share(part: f64, total: f64) -> f64 {
    let value = part / total;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

pub fn success_category(global: f64) -> SuccessCategory {
    if global >= 10.0 {
        SuccessCategory::Blockbuster
    } else if global >= 5.0 {
        SuccessCategory::MajorHit
    } else if global >= 1.0 {
        SuccessCategory::Hit
    } else {
        SuccessCategory::Niche
    }
}

pub fn multi_region_success(regional: [f64; 4]) -> bool {
    regional
        .iter()
        .filter(|v| **v > SIGNIFICANT_REGIONAL_SALES)
        .count()
        >= MULTI_REGION_MIN_REGIONS
}

pub fn derive_row(row: &SalesRecord) -> PreparedRecord {
    let sales = row.sales;
    PreparedRecord {
        rank: row.rank,
        name: row.name.clone(),
        platform: row.platform.clone(),
        year: row.year,
        genre: row.genre.clone(),
        publisher: row.publisher.clone(),
        na_sales: sales.na,
        eu_sales: sales.eu,
        jp_sales: sales.jp,
        other_sales: sales.other,
        global_sales: sales.global,
        decade: decade(row.year),
        era: era(row.year),
        na_sales_pct: share(sales.na, sales.global),
        eu_sales_pct: share(sales.eu, sales.global),
        jp_sales_pct: share(sales.jp, sales.global),
        other_sales_pct: share(sales.other, sales.global),
        success_category: success_category(sales.global),
        multi_region_success: multi_region_success(sales.regional()),
    }
}

/// Appends the derived columns to every row of a cleaned table.
#[instrument(skip_all, fields(rows = table.len()))]
pub fn derive(table: &Table<SalesRecord>) -> Table<PreparedRecord> {
    let prepared = table.map(derive_row);
    info!("derived features created");
    prepared
}
