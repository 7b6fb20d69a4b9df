//! Coercion of hand-typed scoring fields into numbers.
//!
//! `None` marks a value that could not be read as a number. It is kept apart
//! from `Some(0.0)` here; the scorer treats both as contributing nothing.

use crate::config::ScoringField;
use crate::table::{Cell, Table};

/// Reads a free-text number such as `"30 dias"` or `"0,5"`.
///
/// Every character other than an ASCII digit, `.` or `,` is dropped, commas
/// become decimal points, and the rest must parse as a decimal.
pub fn parse_numeric_text(s: &str) -> Option<f64> {
    let digits: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok()
}

/// Generic rule: numbers pass through, text goes through [`parse_numeric_text`].
pub fn to_number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) => (!n.is_nan()).then_some(*n),
        Cell::Text(s) => parse_numeric_text(s),
        Cell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Cell::Date(_) | Cell::Empty => None,
    }
}

/// `Riesgo_bajo` accepts yes/no answers before falling back to the generic rule.
pub fn low_risk_to_number(cell: &Cell) -> Option<f64> {
    if let Cell::Text(s) = cell {
        match s.trim().to_lowercase().as_str() {
            "si" | "sí" => return Some(5.0),
            "no" => return Some(1.0),
            _ => {}
        }
    }
    to_number(cell)
}

pub fn normalize_field(field: ScoringField, cell: &Cell) -> Option<f64> {
    match field {
        ScoringField::RiesgoBajo => low_risk_to_number(cell),
        ScoringField::ImpactoVentas
        | ScoringField::TiempoImpl
        | ScoringField::Facilidad
        | ScoringField::AlineacionVision
        | ScoringField::Diferenciacion => to_number(cell),
    }
}

/// Rewrites every scoring column present in `table` with its normalized value.
///
/// Unparseable values become [`Cell::Empty`]. Columns missing from the table are
/// left missing. Returns the number of cells that could not be read.
pub fn normalize_table(table: &mut Table) -> usize {
    let mut unparseable = 0;

    for field in ScoringField::ALL {
        let Some(idx) = table.column_index(field.column()) else {
            continue;
        };

        for row in &mut table.rows {
            let value = normalize_field(field, &row[idx]);
            if value.is_none() && !row[idx].is_empty() {
                unparseable += 1;
            }
            row[idx] = Cell::from(value);
        }
    }

    unparseable
}
