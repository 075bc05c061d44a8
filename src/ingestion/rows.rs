//! Row coercion into canonical records.
//!
//! A single linear pass turns raw rows into [`Record`]s: blank separator
//! rows are dropped, cells are zipped against the header set up to the
//! shorter of the two, and every present cell lands as its trimmed string
//! form.

use crate::types::{CellValue, HeaderSet, Record};

/// A raw cell prior to normalization.
///
/// Delimited sources only ever produce `Text`; workbook grids produce the
/// full range of typed cells.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    /// Absent cell (an empty spreadsheet cell).
    Null,
    /// Text cell, not yet trimmed.
    Text(String),
    /// Boolean cell.
    Bool(bool),
    /// Integer cell.
    Int(i64),
    /// Floating point cell.
    Float(f64),
}

impl RawCell {
    /// A blank cell is null or trims to the empty string; a row made
    /// entirely of blank cells is a separator, not data.
    fn is_blank(&self) -> bool {
        match self {
            RawCell::Null => true,
            RawCell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    fn normalize(self) -> CellValue {
        match self {
            RawCell::Null => CellValue::Missing,
            RawCell::Text(s) => CellValue::Text(s.trim().to_owned()),
            RawCell::Bool(b) => CellValue::Text(b.to_string()),
            RawCell::Int(i) => CellValue::Text(i.to_string()),
            RawCell::Float(f) => CellValue::Text(render_float(f)),
        }
    }
}

/// Integral floats render without the trailing `.0`, matching how the cell
/// displays in a spreadsheet.
fn render_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        (f as i64).to_string()
    } else {
        f.to_string()
    }
}

/// Coerce one raw row against `headers`.
///
/// Returns `None` for a blank separator row. Extra cells beyond the header
/// count are discarded; a short row simply omits the trailing keys. A later
/// cell under a duplicated header overwrites the earlier one.
pub fn coerce_row(headers: &HeaderSet, row: Vec<RawCell>) -> Option<Record> {
    if row.is_empty() || row.iter().all(RawCell::is_blank) {
        return None;
    }

    let mut record = Record::new();
    for (name, cell) in headers.iter().zip(row) {
        record.insert(name.to_owned(), cell.normalize());
    }
    Some(record)
}

/// Coerce a sequence of raw rows, preserving input order.
pub fn coerce_rows<I>(headers: &HeaderSet, rows: I) -> Vec<Record>
where
    I: IntoIterator<Item = Vec<RawCell>>,
{
    rows.into_iter()
        .filter_map(|row| coerce_row(headers, row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{RawCell, coerce_row, coerce_rows};
    use crate::ingestion::headers::normalize_header_row;
    use crate::types::CellValue;

    fn text(s: &str) -> RawCell {
        RawCell::Text(s.to_owned())
    }

    #[test]
    fn blank_rows_are_dropped() {
        let headers = normalize_header_row(["a", "b"]);
        assert_eq!(coerce_row(&headers, vec![]), None);
        assert_eq!(coerce_row(&headers, vec![text(""), text("  ")]), None);
        assert_eq!(coerce_row(&headers, vec![RawCell::Null, RawCell::Null]), None);

        let records = coerce_rows(
            &headers,
            vec![
                vec![text("1"), text("2")],
                vec![text(""), text("")],
                vec![text("3"), text("4")],
            ],
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("a"), Some(&CellValue::Text("3".into())));
    }

    #[test]
    fn short_row_omits_trailing_keys() {
        let headers = normalize_header_row(["a", "b", "c"]);
        let record = coerce_row(&headers, vec![text("x"), text("y")]).unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("c"), None);
    }

    #[test]
    fn long_row_drops_extra_cells() {
        let headers = normalize_header_row(["a"]);
        let record = coerce_row(&headers, vec![text("x"), text("dropped")]).unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("a"), Some(&CellValue::Text("x".into())));
    }

    #[test]
    fn duplicate_header_keeps_the_later_cell() {
        let headers = normalize_header_row(["amount", "amount"]);
        let record = coerce_row(&headers, vec![text("1"), text("2")]).unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("amount"), Some(&CellValue::Text("2".into())));
    }

    #[test]
    fn null_is_missing_but_whitespace_trims_to_empty_text() {
        let headers = normalize_header_row(["a", "b"]);
        let record = coerce_row(&headers, vec![RawCell::Null, text("  ")]).unwrap();
        assert_eq!(record.get("a"), Some(&CellValue::Missing));
        assert_eq!(record.get("b"), Some(&CellValue::Text(String::new())));
    }

    #[test]
    fn typed_cells_render_as_display_strings() {
        let headers = normalize_header_row(["a", "b", "c", "d"]);
        let record = coerce_row(
            &headers,
            vec![
                RawCell::Int(150),
                RawCell::Float(15_000_000.0),
                RawCell::Float(0.85),
                RawCell::Bool(true),
            ],
        )
        .unwrap();
        assert_eq!(record.get("a"), Some(&CellValue::Text("150".into())));
        assert_eq!(record.get("b"), Some(&CellValue::Text("15000000".into())));
        assert_eq!(record.get("c"), Some(&CellValue::Text("0.85".into())));
        assert_eq!(record.get("d"), Some(&CellValue::Text("true".into())));
    }

    #[test]
    fn values_are_trimmed() {
        let headers = normalize_header_row(["a"]);
        let record = coerce_row(&headers, vec![text("  Sunset Apartments  ")]).unwrap();
        assert_eq!(record.get("a"), Some(&CellValue::Text("Sunset Apartments".into())));
    }
}
