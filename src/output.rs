//! Serialization of a rated table for download.
//!
//! Supports `.xlsx` (in memory or on disk) and CSV.

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};
use tracing::{debug, info};

use crate::table::{Cell, Table};

pub const SHEET_NAME: &str = "Proyectos_con_score";

/// Renders the table as a single-sheet `.xlsx` workbook.
pub fn to_xlsx_bytes(table: &Table) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(table)?;
    Ok(workbook.save_to_buffer()?)
}

/// Writes the table to an `.xlsx` file at `path`, replacing any existing file.
#[tracing::instrument(skip(table), fields(rows = table.len()))]
pub fn write_xlsx(path: &str, table: &Table) -> Result<()> {
    let mut workbook = build_workbook(table)?;
    workbook
        .save(path)
        .with_context(|| format!("failed to write workbook '{path}'"))?;
    info!(path, "Enriched workbook written");
    Ok(())
}

fn build_workbook(table: &Table) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, name) in table.columns.iter().enumerate() {
        let col = u16::try_from(col).context("too many columns for a worksheet")?;
        sheet.write_string_with_format(0, col, name, &header_format)?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let r = u32::try_from(r + 1).context("too many rows for a worksheet")?;
        for (col, cell) in row.iter().enumerate() {
            let col = u16::try_from(col).context("too many columns for a worksheet")?;
            match cell {
                Cell::Empty => {}
                Cell::Text(s) => {
                    sheet.write_string(r, col, s)?;
                }
                Cell::Number(n) => {
                    sheet.write_number(r, col, *n)?;
                }
                Cell::Bool(b) => {
                    sheet.write_boolean(r, col, *b)?;
                }
                Cell::Date(dt) => {
                    sheet.write_datetime_with_format(r, col, dt, &date_format)?;
                }
            }
        }
    }

    sheet.autofit();
    debug!(rows = table.len(), columns = table.columns.len(), "Workbook built");
    Ok(workbook)
}

/// Writes the table as CSV with a header row, replacing any existing file.
#[tracing::instrument(skip(table), fields(rows = table.len()))]
pub fn write_csv(path: &str, table: &Table) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("failed to create '{path}'"))?;

    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|c| c.to_string()))?;
    }
    writer.flush()?;

    info!(path, "Enriched CSV written");
    Ok(())
}
