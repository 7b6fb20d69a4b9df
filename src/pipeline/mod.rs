//! Cleaning, scoring and classification of a project workbook.
//!
//! Raw rows from the first sheet go through header detection, field
//! normalization, the weighted score and the status cascade. The result is a
//! new table with `Score` and `Semaforo` columns, sorted by score descending.

pub mod header;
pub mod normalize;
pub mod score;
pub mod status;

use anyhow::{Result, bail};
use chrono::{Local, NaiveDate};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::config::ScoringPolicy;
use crate::table::{Cell, Table};
use crate::workbook::read_first_sheet;
use header::{column_names, locate_header};
use normalize::normalize_table;
use status::{Facts, Status, classify};

pub const SCORE_COLUMN: &str = "Score";
pub const STATUS_COLUMN: &str = "Semaforo";

/// Rates a workbook with the default policy, judged against today's date.
///
/// # Errors
///
/// Fails only when the workbook cannot be read or its first sheet is empty.
pub fn process(bytes: &[u8]) -> Result<Table> {
    process_with(bytes, &ScoringPolicy::default(), Local::now().date_naive())
}

/// Rates a workbook with an explicit policy and evaluation date.
pub fn process_with(bytes: &[u8], policy: &ScoringPolicy, today: NaiveDate) -> Result<Table> {
    let raw = read_first_sheet(bytes)?;
    enrich(raw, policy, today)
}

/// Runs the pipeline over header-less rows already read from a sheet.
///
/// Every row beneath the header is kept, blank ones included; a blank row
/// scores zero and lands in the parking tier.
#[tracing::instrument(skip(raw, policy, today), fields(raw_rows = raw.len(), today = %today))]
pub fn enrich(raw: Vec<Vec<Cell>>, policy: &ScoringPolicy, today: NaiveDate) -> Result<Table> {
    if raw.is_empty() {
        bail!("sheet has no readable rows");
    }

    let header_row = match locate_header(&raw) {
        Some(idx) => {
            debug!(header_row = idx, "Header row located");
            idx
        }
        None => {
            warn!("No 'Proyecto' header row found, using the first row as header");
            0
        }
    };

    let mut head = raw;
    let data = head.split_off(header_row + 1);
    let header = head.pop().unwrap_or_default();

    let mut table = Table::new(column_names(&header), data);

    let unparseable = normalize_table(&mut table);
    debug!(
        rows = table.len(),
        unparseable, "Scoring fields normalized"
    );

    let scores: Vec<f64> = table
        .records()
        .map(|record| score::score(&record, &policy.weights))
        .collect();

    let statuses: Vec<Status> = table
        .records()
        .zip(&scores)
        .map(|(record, s)| classify(&Facts::from_record(&record, *s, today), &policy.thresholds))
        .collect();

    let score_idx = table.ensure_column(SCORE_COLUMN);
    let status_idx = table.ensure_column(STATUS_COLUMN);

    for (row, (s, st)) in table.rows.iter_mut().zip(scores.iter().zip(&statuses)) {
        row[score_idx] = Cell::Number(*s);
        row[status_idx] = Cell::Text(st.label().to_string());
    }

    sort_by_score(&mut table, score_idx);

    let mut counts: HashMap<Status, usize> = HashMap::new();
    for st in &statuses {
        *counts.entry(*st).or_default() += 1;
    }
    for (st, count) in &counts {
        debug!(status = %st, count, "Status tally");
    }

    info!(projects = table.len(), "Workbook rated");
    Ok(table)
}

/// Stable descending sort, so equal scores keep their source order.
fn sort_by_score(table: &mut Table, score_idx: usize) {
    let key = |row: &Vec<Cell>| row[score_idx].as_number().unwrap_or(0.0);
    table
        .rows
        .sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|c| Cell::from(*c)).collect()
    }

    fn column(table: &Table, name: &str) -> Vec<Cell> {
        let idx = table.column_index(name).unwrap();
        table.rows.iter().map(|r| r[idx].clone()).collect()
    }

    #[test]
    fn test_empty_sheet_is_an_error() {
        assert!(enrich(vec![], &ScoringPolicy::default(), today()).is_err());
    }

    #[test]
    fn test_banner_rows_are_skipped() {
        let raw = vec![
            row(&["Tablero de proyectos"]),
            row(&[]),
            row(&["Proyecto", "Dueño", "Impacto_ventas"]),
            row(&["CRM", "Ana", "5"]),
        ];

        let table = enrich(raw, &ScoringPolicy::default(), today()).unwrap();

        assert_eq!(
            table.columns,
            vec!["Proyecto", "Dueño", "Impacto_ventas", "Score", "Semaforo"]
        );
        assert_eq!(table.len(), 1);
        assert_eq!(column(&table, "Score"), vec![Cell::Number(10.0)]);
    }

    #[test]
    fn test_first_row_is_header_without_marker() {
        let raw = vec![
            row(&["Nombre", "Facilidad"]),
            row(&["CRM", "2"]),
            row(&["ERP", "4"]),
        ];

        let table = enrich(raw, &ScoringPolicy::default(), today()).unwrap();

        assert_eq!(table.columns[0], "Nombre");
        assert_eq!(column(&table, "Score"), vec![Cell::Number(6.0), Cell::Number(3.0)]);
    }

    #[test]
    fn test_sorted_by_score_and_labelled() {
        let raw = vec![
            row(&["Proyecto", "Impacto_ventas", "Alineacion_vision", "Estado_manual", "ETD"]),
            row(&["Bajo", "1", "1", "", ""]),
            row(&["Alto", "10", "10", "", "2030-01-01"]),
            row(&["Hecho", "5", "", "Completado", "2020-01-01"]),
        ];

        let table = enrich(raw, &ScoringPolicy::default(), today()).unwrap();

        assert_eq!(
            column(&table, "Proyecto"),
            vec![Cell::from("Alto"), Cell::from("Hecho"), Cell::from("Bajo")]
        );
        assert_eq!(
            column(&table, "Semaforo"),
            vec![
                Cell::from(Status::Strategic.label()),
                Cell::from(Status::Completed.label()),
                Cell::from(Status::ParkingNoEtd.label()),
            ]
        );
    }

    #[test]
    fn test_existing_score_column_is_overwritten() {
        let raw = vec![
            row(&["Proyecto", "Score", "Facilidad"]),
            row(&["CRM", "999", "2"]),
        ];

        let table = enrich(raw, &ScoringPolicy::default(), today()).unwrap();

        assert_eq!(table.columns, vec!["Proyecto", "Score", "Facilidad", "Semaforo"]);
        assert_eq!(column(&table, "Score"), vec![Cell::Number(3.0)]);
    }

    #[test]
    fn test_blank_rows_are_kept_as_parking() {
        let raw = vec![
            row(&["Proyecto", "Facilidad"]),
            row(&["CRM", "2"]),
            vec![Cell::Empty, Cell::Text("  ".into())],
            row(&["ERP", "x"]),
        ];

        let table = enrich(raw, &ScoringPolicy::default(), today()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(
            column(&table, "Proyecto"),
            vec![Cell::from("CRM"), Cell::Empty, Cell::from("ERP")]
        );
        assert_eq!(
            column(&table, "Facilidad"),
            vec![Cell::Number(2.0), Cell::Empty, Cell::Empty]
        );
        assert_eq!(
            column(&table, "Score"),
            vec![Cell::Number(3.0), Cell::Number(0.0), Cell::Number(0.0)]
        );
        assert_eq!(
            column(&table, "Semaforo")[1],
            Cell::from(Status::ParkingNoEtd.label())
        );
    }

    #[test]
    fn test_header_only_sheet_yields_empty_table() {
        let raw = vec![row(&["Proyecto", "Dueño"])];
        let table = enrich(raw, &ScoringPolicy::default(), today()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns, vec!["Proyecto", "Dueño", "Score", "Semaforo"]);
    }
}
