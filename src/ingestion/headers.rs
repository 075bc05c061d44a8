//! Header canonicalization.

use crate::types::HeaderSet;

/// Canonicalize one raw header label: trim, spaces to underscores,
/// lowercase. An empty label stays empty: unusual, but a valid canonical
/// name.
pub fn canonical_label(raw: &str) -> String {
    raw.trim().replace(' ', "_").to_lowercase()
}

/// Build a [`HeaderSet`] from the raw first row of a headered source.
///
/// Duplicate labels are kept in order; when a row is coerced into a record,
/// a later column under the same canonical name overwrites the earlier one.
pub fn normalize_header_row<'a, I>(labels: I) -> HeaderSet
where
    I: IntoIterator<Item = &'a str>,
{
    HeaderSet::new(labels.into_iter().map(canonical_label).collect())
}

/// Synthesize positional labels `column_0..column_{width-1}` for a source
/// with no header row. `width` is the cell count of the first row.
pub fn positional_headers(width: usize) -> HeaderSet {
    HeaderSet::new((0..width).map(|i| format!("column_{i}")).collect())
}
