//! CSV-based bracket loader
//!
//! Tables have no header and two columns, `upper_bound,rate`, one row per
//! range in ascending order. The final row leaves `upper_bound` blank (or
//! writes `inf`) for the open-ended top range.

use super::bracket::TaxBracket;
use crate::error::LoadError;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Default directory holding the bundled 2021 tables
pub const DEFAULT_BRACKET_DIR: &str = "data/2021";

/// Load a bracket table from a CSV file
pub fn load_tax_bracket<P: AsRef<Path>>(path: P) -> Result<TaxBracket, LoadError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let bracket = load_tax_bracket_from_reader(file)?;
    log::info!(
        "Loaded {} tax ranges from {}",
        bracket.ranges().len(),
        path.display()
    );
    Ok(bracket)
}

/// Load a bracket table from any reader (e.g. string buffer)
pub fn load_tax_bracket_from_reader<R: Read>(reader: R) -> Result<TaxBracket, LoadError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let records = csv_reader.records().collect::<Result<Vec<_>, _>>()?;
    let mut rows = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let row = index + 1;
        if record.len() != 2 {
            return Err(LoadError::ColumnCount {
                row,
                found: record.len(),
            });
        }

        let upper = parse_upper_bound(&record[0], row)?;
        if upper == f64::INFINITY && row != records.len() {
            return Err(LoadError::UnboundedRowNotLast { row });
        }

        let rate: f64 = record[1].parse().map_err(|_| LoadError::InvalidNumber {
            row,
            field: "rate",
            value: record[1].to_string(),
        })?;

        log::debug!("row {}: upper_bound={} rate={}", row, upper, rate);
        rows.push((upper, rate));
    }

    Ok(TaxBracket::from_bounds(&rows)?)
}

/// Blank or `inf` means the range is open-ended
fn parse_upper_bound(field: &str, row: usize) -> Result<f64, LoadError> {
    if field.is_empty() || field.eq_ignore_ascii_case("inf") {
        return Ok(f64::INFINITY);
    }
    field.parse().map_err(|_| LoadError::InvalidNumber {
        row,
        field: "upper_bound",
        value: field.to_string(),
    })
}
