//! Spreadsheet decoding for uploaded workbooks.

use anyhow::{Context, Result, anyhow, bail};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::{NaiveDate, NaiveDateTime};
use std::io::Cursor;
use tracing::debug;

use crate::table::Cell;

impl From<&Data> for Cell {
    fn from(d: &Data) -> Self {
        match d {
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => dt.as_datetime().map_or(Cell::Empty, Cell::Date),
            Data::DateTimeIso(s) => parse_iso(s).map_or_else(|| Cell::Text(s.clone()), Cell::Date),
            Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(_) | Data::Empty => Cell::Empty,
        }
    }
}

fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Decodes the first sheet of an `.xlsx`/`.xls`/`.ods` buffer into header-less rows.
///
/// # Errors
///
/// Returns an error if the bytes are not a readable workbook, the workbook has
/// no sheets, or the first sheet has no rows.
#[tracing::instrument(skip(bytes), fields(bytes = bytes.len()))]
pub fn read_first_sheet(bytes: &[u8]) -> Result<Vec<Vec<Cell>>> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).context("failed to open workbook")?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("workbook has no sheets"))?
        .context("failed to read first sheet")?;

    if range.is_empty() {
        bail!("first sheet has no readable rows");
    }

    let rows: Vec<Vec<Cell>> = range
        .rows()
        .map(|r| r.iter().map(Cell::from).collect())
        .collect();

    debug!(
        rows = rows.len(),
        width = range.width(),
        "First sheet decoded"
    );

    Ok(rows)
}
