#![cfg(feature = "excel")]

//! Workbook ingestion: worksheet grids and defined-name extraction.
//!
//! Workbooks are opened with their cached computed values; formulas are
//! never evaluated here. Per-name resolution failures skip that single name
//! and keep going; only failures to open or read the container itself
//! reach the caller.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};

use crate::error::IngestResult;
use crate::ingestion::headers::normalize_header_row;
use crate::ingestion::rows::{RawCell, coerce_row};
use crate::types::{NamedRangeTable, RangeValue, RecordSet, Scalar};

type Workbook = Sheets<BufReader<File>>;

/// Ingest one worksheet grid into a [`RecordSet`].
///
/// Picks `sheet` if provided, otherwise the first sheet in the workbook.
/// The first non-blank row is taken as the header row and canonicalized;
/// the remaining rows run through the shared row coercer. A workbook with
/// no sheets, or a sheet with no non-blank rows, yields an empty record
/// set.
pub fn ingest_workbook_from_path(
    path: impl AsRef<Path>,
    sheet: Option<&str>,
) -> IngestResult<RecordSet> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_name = match sheet {
        Some(name) => name.to_owned(),
        None => match workbook.sheet_names().first() {
            Some(name) => name.clone(),
            None => return Ok(RecordSet::default()),
        },
    };

    let range = workbook.worksheet_range(&sheet_name)?;
    Ok(ingest_grid(&range))
}

fn ingest_grid(range: &Range<Data>) -> RecordSet {
    let mut rows = range.rows();

    let header_cells = loop {
        match rows.next() {
            Some(row) if row.iter().any(|cell| !matches!(cell, Data::Empty)) => break row,
            Some(_) => continue,
            None => return RecordSet::default(),
        }
    };

    let labels: Vec<String> = header_cells.iter().map(header_label).collect();
    let headers = normalize_header_row(labels.iter().map(String::as_str));

    let mut records = Vec::new();
    for row in rows {
        let cells = row.iter().map(raw_cell).collect();
        if let Some(record) = coerce_row(&headers, cells) {
            records.push(record);
        }
    }

    RecordSet::new(headers, records)
}

fn header_label(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn raw_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Null,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::Int(i) => RawCell::Int(*i),
        Data::Float(f) => RawCell::Float(*f),
        Data::DateTime(dt) => RawCell::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Error(e) => RawCell::Text(format!("{e:?}")),
    }
}

/// Resolve every defined name in the workbook to its current value.
///
/// Single-cell names resolve to a [`Scalar`], multi-cell names to row-major
/// nested rows. A name whose reference is malformed, carries a `#REF!`
/// leftover from a deleted region, or points at a missing sheet is skipped;
/// the enumeration never aborts because of one bad name. The returned table
/// is a snapshot of the workbook as read.
pub fn extract_named_ranges_from_path(path: impl AsRef<Path>) -> IngestResult<NamedRangeTable> {
    let mut workbook = open_workbook_auto(path)?;

    let defined: Vec<(String, String)> = workbook.defined_names().to_vec();
    let mut table = NamedRangeTable::default();
    for (name, reference) in defined {
        if let Some(value) = resolve_reference(&mut workbook, &reference) {
            table.entries.insert(name, value);
        }
    }
    Ok(table)
}

fn resolve_reference(workbook: &mut Workbook, reference: &str) -> Option<RangeValue> {
    let reference = reference.trim().trim_start_matches('=');
    // Multi-area names and deleted-region leftovers are unresolvable.
    if reference.contains(',') || reference.contains("#REF!") {
        return None;
    }

    let (sheet, cells) = reference.rsplit_once('!')?;
    let sheet = unquote_sheet_name(sheet);
    let range = workbook.worksheet_range(&sheet).ok()?;

    match cells.split_once(':') {
        None => {
            let (row, col) = parse_cell_ref(cells)?;
            Some(RangeValue::Scalar(cell_scalar(&range, row, col)))
        }
        Some((start, end)) => {
            let (top, left) = parse_cell_ref(start)?;
            let (bottom, right) = parse_cell_ref(end)?;
            if bottom < top || right < left {
                return None;
            }
            if top == bottom && left == right {
                return Some(RangeValue::Scalar(cell_scalar(&range, top, left)));
            }

            let mut out = Vec::with_capacity((bottom - top + 1) as usize);
            for row in top..=bottom {
                let mut cells_row = Vec::with_capacity((right - left + 1) as usize);
                for col in left..=right {
                    cells_row.push(cell_scalar(&range, row, col));
                }
                out.push(cells_row);
            }
            Some(RangeValue::Rows(out))
        }
    }
}

fn unquote_sheet_name(raw: &str) -> String {
    let raw = raw.trim();
    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        raw[1..raw.len() - 1].replace("''", "'")
    } else {
        raw.to_owned()
    }
}

/// Parse an `$A$1`-style reference into zero-based `(row, col)`.
fn parse_cell_ref(raw: &str) -> Option<(u32, u32)> {
    let mut col: u64 = 0;
    let mut row: u64 = 0;
    let mut saw_letter = false;
    let mut saw_digit = false;

    for ch in raw.trim().chars() {
        match ch {
            '$' => {
                if saw_digit {
                    return None;
                }
            }
            'A'..='Z' | 'a'..='z' => {
                if saw_digit {
                    return None;
                }
                saw_letter = true;
                col = col * 26 + u64::from(ch.to_ascii_uppercase() as u8 - b'A') + 1;
            }
            '0'..='9' => {
                saw_digit = true;
                row = row * 10 + u64::from(ch as u8 - b'0');
            }
            _ => return None,
        }
        if col > u64::from(u32::MAX) || row > u64::from(u32::MAX) {
            return None;
        }
    }

    if !saw_letter || !saw_digit || row == 0 {
        return None;
    }
    Some(((row - 1) as u32, (col - 1) as u32))
}

/// A cell outside the sheet's used range is simply empty.
fn cell_scalar(range: &Range<Data>, row: u32, col: u32) -> Scalar {
    match range.get_value((row, col)) {
        Some(Data::String(s)) => Scalar::Utf8(s.clone()),
        Some(Data::Int(i)) => Scalar::Int64(*i),
        Some(Data::Float(f)) => Scalar::Float64(*f),
        Some(Data::Bool(b)) => Scalar::Bool(*b),
        Some(Data::DateTime(dt)) => Scalar::Float64(dt.as_f64()),
        Some(Data::DateTimeIso(s)) | Some(Data::DurationIso(s)) => Scalar::Utf8(s.clone()),
        Some(Data::Error(e)) => Scalar::Utf8(format!("{e:?}")),
        Some(Data::Empty) | None => Scalar::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_cell_ref, unquote_sheet_name};

    #[test]
    fn parses_absolute_and_relative_refs() {
        assert_eq!(parse_cell_ref("$A$1"), Some((0, 0)));
        assert_eq!(parse_cell_ref("B12"), Some((11, 1)));
        assert_eq!(parse_cell_ref("$AA$3"), Some((2, 26)));
    }

    #[test]
    fn rejects_malformed_refs() {
        assert_eq!(parse_cell_ref(""), None);
        assert_eq!(parse_cell_ref("A"), None);
        assert_eq!(parse_cell_ref("12"), None);
        assert_eq!(parse_cell_ref("A0"), None);
        assert_eq!(parse_cell_ref("1A"), None);
        assert_eq!(parse_cell_ref("A1:B2"), None);
    }

    #[test]
    fn unquotes_sheet_names() {
        assert_eq!(unquote_sheet_name("Sheet1"), "Sheet1");
        assert_eq!(unquote_sheet_name("'Rent Roll'"), "Rent Roll");
        assert_eq!(unquote_sheet_name("'It''s'"), "It's");
    }
}
