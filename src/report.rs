//! Board summary and top-N selection over a rated table.

use serde::Serialize;
use tracing::info;

use crate::pipeline::{SCORE_COLUMN, STATUS_COLUMN};
use crate::table::Table;

/// Columns shown for the projects recommended for focus, when present.
pub const TOP_COLUMNS: &[&str] = &[
    "Proyecto",
    "Dueño",
    SCORE_COLUMN,
    STATUS_COLUMN,
    "ETD",
    "Estado_manual",
];

/// Headline counts of a rated board.
///
/// Each count matches a keyword inside the status label, so the completed
/// label counts as on track.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub overdue: usize,
    pub urgent: usize,
    pub on_track: usize,
    pub parking: usize,
    pub avg_score: f64,
}

impl Summary {
    pub fn from_table(table: &Table) -> Self {
        let labels: Vec<String> = match table.column_index(STATUS_COLUMN) {
            Some(idx) => table.rows.iter().map(|r| r[idx].to_string()).collect(),
            None => Vec::new(),
        };
        let count = |keyword: &str| labels.iter().filter(|l| l.contains(keyword)).count();

        let scores: Vec<f64> = match table.column_index(SCORE_COLUMN) {
            Some(idx) => table.rows.iter().filter_map(|r| r[idx].as_number()).collect(),
            None => Vec::new(),
        };

        Summary {
            total: table.len(),
            overdue: count("ROJO"),
            urgent: count("AMARILLO"),
            on_track: count("VERDE"),
            parking: count("Parking"),
            avg_score: mean(&scores),
        }
    }
}

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// The first `n` rows restricted to [`TOP_COLUMNS`]. Expects a table already
/// sorted by score.
pub fn top_projects(table: &Table, n: usize) -> Table {
    table.head(n).select(TOP_COLUMNS)
}

/// Logs the summary as structured fields.
pub fn log_summary(summary: &Summary) {
    info!(
        total = summary.total,
        overdue = summary.overdue,
        urgent = summary.urgent,
        on_track = summary.on_track,
        parking = summary.parking,
        avg_score = summary.avg_score,
        "Board summary"
    );
}

/// Logs one line per row of a top-N table.
pub fn log_top(top: &Table) {
    for (rank, row) in top.rows.iter().enumerate() {
        let line = top
            .columns
            .iter()
            .zip(row)
            .map(|(name, cell)| format!("{name}={cell}"))
            .collect::<Vec<_>>()
            .join(" | ");
        info!(rank = rank + 1, "{}", line);
    }
}
