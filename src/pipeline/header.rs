use crate::table::Cell;

const HEADER_TOKEN: &str = "proyecto";

/// Finds the first row whose first cell reads `Proyecto` (trimmed, any case).
///
/// Returns `None` when no such row exists, meaning the sheet's first row is the header.
/// Only the first cell is inspected, so a data row whose project is literally named
/// "Proyecto" is taken as the header too.
pub fn locate_header(rows: &[Vec<Cell>]) -> Option<usize> {
    rows.iter().position(|row| {
        row.first()
            .is_some_and(|c| c.to_string().trim().to_lowercase() == HEADER_TOKEN)
    })
}

/// Turns a header row into column names. Blank header cells become `column_<n>`.
pub fn column_names(header: &[Cell]) -> Vec<String> {
    header
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let name = c.to_string().trim().to_string();
            if name.is_empty() {
                format!("column_{}", i + 1)
            } else {
                name
            }
        })
        .collect()
}
