//! Row types flowing through both pipelines.
//!
//! `RawRecord` mirrors the source file before any coercion, `SalesRecord` is a
//! cleaned row and `PreparedRecord` is a cleaned row plus derived columns, in
//! the exact column order of the intermediate file.
use serde::{Deserialize, Serialize};

/// Columns every source file must carry.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "Rank",
    "Name",
    "Platform",
    "Year",
    "Genre",
    "Publisher",
    "NA_Sales",
    "EU_Sales",
    "JP_Sales",
    "Other_Sales",
    "Global_Sales",
];

/// Columns appended by feature derivation.
pub const DERIVED_COLUMNS: [&str; 8] = [
    "Decade",
    "Era",
    "NA_Sales_Pct",
    "EU_Sales_Pct",
    "JP_Sales_Pct",
    "Other_Sales_Pct",
    "Success_Category",
    "Multi_Region_Success",
];

/// Header of the intermediate file.
pub fn prepared_columns() -> impl Iterator<Item = &'static str> {
    REQUIRED_COLUMNS.iter().chain(DERIVED_COLUMNS.iter()).copied()
}

/// One source row, every field still untyped and possibly missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Rank")]
    pub rank: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Platform")]
    pub platform: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Genre")]
    pub genre: Option<String>,
    #[serde(rename = "Publisher")]
    pub publisher: Option<String>,
    #[serde(rename = "NA_Sales")]
    pub na_sales: Option<String>,
    #[serde(rename = "EU_Sales")]
    pub eu_sales: Option<String>,
    #[serde(rename = "JP_Sales")]
    pub jp_sales: Option<String>,
    #[serde(rename = "Other_Sales")]
    pub other_sales: Option<String>,
    #[serde(rename = "Global_Sales")]
    pub global_sales: Option<String>,
}

impl RawRecord {
    /// Sales fields in `SALES_COLUMNS` order.
    pub fn sales_fields(&self) -> [Option<&str>; 5] {
        [
            self.na_sales.as_deref(),
            self.eu_sales.as_deref(),
            self.jp_sales.as_deref(),
            self.other_sales.as_deref(),
            self.global_sales.as_deref(),
        ]
    }
}

/// Sales measures, regional first, then global.
pub const SALES_COLUMNS: [&str; 5] = [
    "NA_Sales",
    "EU_Sales",
    "JP_Sales",
    "Other_Sales",
    "Global_Sales",
];

/// Regional and global sales in millions of units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sales {
    pub na: f64,
    pub eu: f64,
    pub jp: f64,
    pub other: f64,
    pub global: f64,
}

impl Sales {
    pub fn from_array([na, eu, jp, other, global]: [f64; 5]) -> Self {
        Self {
            na,
            eu,
            jp,
            other,
            global,
        }
    }

    pub fn regional(&self) -> [f64; 4] {
        [self.na, self.eu, self.jp, self.other]
    }

    pub fn all(&self) -> [f64; 5] {
        [self.na, self.eu, self.jp, self.other, self.global]
    }
}

/// A row that survived cleaning: identifiers present and trimmed, measures numeric.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub rank: Option<i64>,
    pub name: String,
    pub platform: String,
    pub year: i32,
    pub genre: String,
    pub publisher: String,
    pub sales: Sales,
}

/// Year-range bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Era {
    #[serde(rename = "Pre-1990")]
    Pre1990,
    #[serde(rename = "1990s")]
    Nineties,
    #[serde(rename = "2000s")]
    TwoThousands,
    #[serde(rename = "2010s+")]
    TwentyTensOnward,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl Era {
    pub fn label(self) -> &'static str {
        match self {
            Era::Pre1990 => "Pre-1990",
            Era::Nineties => "1990s",
            Era::TwoThousands => "2000s",
            Era::TwentyTensOnward => "2010s+",
            Era::Unknown => "Unknown",
        }
    }
}

/// Global-sales tier, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SuccessCategory {
    #[serde(rename = "Blockbuster (10M+)")]
    Blockbuster,
    #[serde(rename = "Major Hit (5-10M)")]
    MajorHit,
    #[serde(rename = "Hit (1-5M)")]
    Hit,
    #[serde(rename = "Niche (<1M)")]
    Niche,
}

impl SuccessCategory {
    pub fn label(self) -> &'static str {
        match self {
            SuccessCategory::Blockbuster => "Blockbuster (10M+)",
            SuccessCategory::MajorHit => "Major Hit (5-10M)",
            SuccessCategory::Hit => "Hit (1-5M)",
            SuccessCategory::Niche => "Niche (<1M)",
        }
    }
}

/// A cleaned row with its derived columns; one line of the intermediate file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedRecord {
    #[serde(rename = "Rank")]
    pub rank: Option<i64>,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Platform")]
    pub platform: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Genre")]
    pub genre: String,
    #[serde(rename = "Publisher")]
    pub publisher: String,
    #[serde(rename = "NA_Sales")]
    pub na_sales: f64,
    #[serde(rename = "EU_Sales")]
    pub eu_sales: f64,
    #[serde(rename = "JP_Sales")]
    pub jp_sales: f64,
    #[serde(rename = "Other_Sales")]
    pub other_sales: f64,
    #[serde(rename = "Global_Sales")]
    pub global_sales: f64,
    #[serde(rename = "Decade")]
    pub decade: i32,
    #[serde(rename = "Era")]
    pub era: Era,
    #[serde(rename = "NA_Sales_Pct")]
    pub na_sales_pct: f64,
    #[serde(rename = "EU_Sales_Pct")]
    pub eu_sales_pct: f64,
    #[serde(rename = "JP_Sales_Pct")]
    pub jp_sales_pct: f64,
    #[serde(rename = "Other_Sales_Pct")]
    pub other_sales_pct: f64,
    #[serde(rename = "Success_Category")]
    pub success_category: SuccessCategory,
    #[serde(rename = "Multi_Region_Success", with = "title_case_bool")]
    pub multi_region_success: bool,
}

impl PreparedRecord {
    pub fn sales(&self) -> Sales {
        Sales {
            na: self.na_sales,
            eu: self.eu_sales,
            jp: self.jp_sales,
            other: self.other_sales,
            global: self.global_sales,
        }
    }

    pub fn shares(&self) -> [f64; 4] {
        [
            self.na_sales_pct,
            self.eu_sales_pct,
            self.jp_sales_pct,
            self.other_sales_pct,
        ]
    }
}

/// Booleans are written `True`/`False` for BI tooling; reading is case-insensitive.
mod title_case_bool {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(if *value { "True" } else { "False" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(d)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(D::Error::custom(format!("invalid boolean {other:?}"))),
        }
    }
}
