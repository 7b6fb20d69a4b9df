use crate::config::Weights;
use crate::table::ProjectRecord;

/// Weighted sum of the normalized scoring fields of one record.
///
/// Fields that are absent from the table or hold no number contribute nothing,
/// so a record with no usable fields scores `0.0`.
pub fn score(record: &ProjectRecord<'_>, weights: &Weights) -> f64 {
    weights
        .iter()
        .filter_map(|(field, weight)| {
            record
                .get(field.column())
                .and_then(|cell| cell.as_number())
                .map(|value| value * weight)
        })
        .fold(0.0, |total, term| total + term)
}
