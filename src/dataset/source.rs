//! Delimited-file readers for both pipelines.
use std::fs::File;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};
use serde::de::DeserializeOwned;
use tracing::{error, info, instrument};

use super::record::{prepared_columns, PreparedRecord, RawRecord, REQUIRED_COLUMNS};
use super::table::Table;
use crate::error::{EtlError, EtlResult};

/// Spellings treated as "no value" in addition to an empty field.
const NA_TOKENS: [&str; 18] = [
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>", "#N/A",
    "#NA", "#N/A N/A", "-1.#IND", "-1.#QNAN", "1.#IND", "1.#QNAN",
];

pub fn is_na(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || NA_TOKENS.contains(&trimmed)
}

fn scrub(value: Option<String>) -> Option<String> {
    value.filter(|v| !is_na(v))
}

impl RawRecord {
    /// Replaces NA spellings with `None`.
    fn scrubbed(self) -> Self {
        Self {
            rank: scrub(self.rank),
            name: scrub(self.name),
            platform: scrub(self.platform),
            year: scrub(self.year),
            genre: scrub(self.genre),
            publisher: scrub(self.publisher),
            na_sales: scrub(self.na_sales),
            eu_sales: scrub(self.eu_sales),
            jp_sales: scrub(self.jp_sales),
            other_sales: scrub(self.other_sales),
            global_sales: scrub(self.global_sales),
        }
    }
}

/// Required columns absent from `headers`, in the order they are required.
pub fn missing_columns<'a, I>(headers: &StringRecord, required: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    required
        .into_iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .map(str::to_string)
        .collect()
}

fn open_validated<'a, I>(path: &Path, required: I) -> EtlResult<Reader<File>>
where
    I: IntoIterator<Item = &'a str>,
{
    if !path.exists() {
        error!(path = %path.display(), "input file not found");
        return Err(EtlError::MissingInput {
            path: path.to_path_buf(),
        });
    }

    // Short rows are padded with missing values.
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let missing = missing_columns(reader.headers()?, required);
    if !missing.is_empty() {
        return Err(EtlError::SchemaViolation {
            path: path.to_path_buf(),
            missing,
        });
    }
    Ok(reader)
}

fn read_rows<R: DeserializeOwned>(path: &Path, reader: &mut Reader<File>) -> EtlResult<Vec<R>> {
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() > headers.len() {
            let line = record.position().map_or(0, |pos| pos.line());
            error!(line, found = record.len(), "row has more fields than the header");
            return Err(EtlError::OverlongRow {
                path: path.to_path_buf(),
                line,
                expected: headers.len(),
                found: record.len(),
            });
        }
        rows.push(record.deserialize(Some(&headers))?);
    }
    Ok(rows)
}

/// Reads the raw sales file and checks that every required column is present.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_raw(path: &Path) -> EtlResult<Table<RawRecord>> {
    let mut reader = open_validated(path, REQUIRED_COLUMNS)?;
    let columns = reader.headers()?.len();
    let rows: Vec<RawRecord> = read_rows(path, &mut reader)?;
    let table: Table<RawRecord> = rows.into_iter().map(RawRecord::scrubbed).collect();
    info!(rows = table.len(), columns, "loaded raw dataset");
    Ok(table)
}

/// Reads an intermediate file written by [`super::sink::write_prepared`].
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_prepared(path: &Path) -> EtlResult<Table<PreparedRecord>> {
    let mut reader = open_validated(path, prepared_columns())?;
    let table = Table::new(read_rows(path, &mut reader)?);
    info!(rows = table.len(), "loaded cleaned dataset");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    const HEADER: &str = "Rank,Name,Platform,Year,Genre,Publisher,\
                          NA_Sales,EU_Sales,JP_Sales,Other_Sales,Global_Sales\n";

    #[test]
    fn missing_file_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_raw(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, EtlError::MissingInput { .. }));
    }

    #[test]
    fn absent_column_is_schema_violation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "short.csv",
            "Rank,Name,Platform,Genre,Publisher,NA_Sales,EU_Sales,JP_Sales,Other_Sales\n\
             1,a,b,c,d,1,1,1,1\n",
        );
        match read_raw(&path).unwrap_err() {
            EtlError::SchemaViolation { missing, .. } => {
                assert_eq!(missing, vec!["Year".to_string(), "Global_Sales".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn na_tokens_and_blanks_become_missing() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!(
            "{HEADER}1,\"Wii Sports, Deluxe\",Wii,N/A,Sports,,41.49,29.02,3.77,8.46,82.74\n"
        );
        let path = write_file(&dir, "raw.csv", &body);
        let table = read_raw(&path).unwrap();
        let row = &table.rows()[0];
        assert_eq!(row.name.as_deref(), Some("Wii Sports, Deluxe"));
        assert_eq!(row.year, None);
        assert_eq!(row.publisher, None);
        assert_eq!(row.global_sales.as_deref(), Some("82.74"));
    }

    #[test]
    fn extra_columns_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let body = "Rank,Name,Platform,Year,Genre,Publisher,\
                    NA_Sales,EU_Sales,JP_Sales,Other_Sales,Global_Sales,Notes\n\
                    2,Tetris,GB,1989,Puzzle,Nintendo,23.2,2.26,4.22,0.58,30.26,classic\n";
        let path = write_file(&dir, "raw.csv", body);
        let table = read_raw(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].year.as_deref(), Some("1989"));
    }

    #[test]
    fn truncated_row_reads_as_missing_trailing_values() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!(
            "{HEADER}1,Tetris,GB,1989,Puzzle,Nintendo,23.2,2.26,4.22,0.58,30.26\n\
             2,Truncated,DS,2005,Puzzle,Nintendo,1.0,1.0\n"
        );
        let path = write_file(&dir, "raw.csv", &body);
        let table = read_raw(&path).unwrap();
        assert_eq!(table.len(), 2);
        let row = &table.rows()[1];
        assert_eq!(row.name.as_deref(), Some("Truncated"));
        assert_eq!(row.eu_sales.as_deref(), Some("1.0"));
        assert_eq!(row.jp_sales, None);
        assert_eq!(row.other_sales, None);
        assert_eq!(row.global_sales, None);
    }

    #[test]
    fn overlong_row_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let body =
            format!("{HEADER}1,Tetris,GB,1989,Puzzle,Nintendo,23.2,2.26,4.22,0.58,30.26,x\n");
        let path = write_file(&dir, "raw.csv", &body);
        match read_raw(&path).unwrap_err() {
            EtlError::OverlongRow {
                line,
                expected,
                found,
                ..
            } => {
                assert_eq!((line, expected, found), (2, 11, 12));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn is_na_trims_before_matching() {
        assert!(is_na("  "));
        assert!(is_na(" N/A "));
        assert!(!is_na("0"));
        assert!(!is_na("Unknown"));
    }
}
