//! Delimited-text ingestion pipeline.
//!
//! The source is read fully into memory, decoded (primary encoding first,
//! the configured fallback second), sniffed for its dialect, then parsed in
//! one pass. Reading once up front keeps the file handle released before
//! parsing starts and means the decode retry never re-opens the source.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use encoding_rs::Encoding;

use crate::error::{IngestError, IngestResult};
use crate::ingestion::dialect::{SAMPLE_LEN, sniff_dialect};
use crate::ingestion::headers::{normalize_header_row, positional_headers};
use crate::ingestion::rows::{RawCell, coerce_row};
use crate::ingestion::unified::IngestOptions;
use crate::types::RecordSet;

/// Ingest a delimited-text file into a [`RecordSet`].
///
/// A zero-byte or all-blank source yields an empty record set, not an
/// error.
pub fn ingest_delimited_from_path(
    path: impl AsRef<Path>,
    options: &IngestOptions,
) -> IngestResult<RecordSet> {
    let bytes = fs::read(path)?;
    ingest_delimited_bytes(&bytes, options)
}

/// Ingest in-memory delimited-text bytes into a [`RecordSet`].
///
/// Honors a forced [`crate::ingestion::dialect::Dialect`] from `options`;
/// otherwise the dialect is sniffed once from the leading sample, falling
/// back to comma-delimited-with-headers when detection is inconclusive.
pub fn ingest_delimited_bytes(bytes: &[u8], options: &IngestOptions) -> IngestResult<RecordSet> {
    let text = decode_text(bytes, options.primary_encoding, options.fallback_encoding)?;
    if text.trim().is_empty() {
        return Ok(RecordSet::default());
    }

    let dialect = match options.dialect {
        Some(dialect) => dialect,
        None => sniff_dialect(leading_sample(&text)).unwrap_or_default(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(dialect.delimiter)
        .quote(dialect.quote)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = reader.records();
    let first = match rows.next() {
        Some(row) => row?,
        None => return Ok(RecordSet::default()),
    };

    let headers;
    let mut records = Vec::new();
    if dialect.has_headers {
        headers = normalize_header_row(first.iter());
    } else {
        headers = positional_headers(first.len());
        if let Some(record) = coerce_row(&headers, record_cells(&first)) {
            records.push(record);
        }
    }

    for row in rows {
        if let Some(record) = coerce_row(&headers, record_cells(&row?)) {
            records.push(record);
        }
    }

    Ok(RecordSet::new(headers, records))
}

fn record_cells(row: &csv::StringRecord) -> Vec<RawCell> {
    row.iter().map(|field| RawCell::Text(field.to_owned())).collect()
}

/// The sniffer sample, clipped to a char boundary.
fn leading_sample(text: &str) -> &str {
    if text.len() <= SAMPLE_LEN {
        return text;
    }
    let mut end = SAMPLE_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Decode `bytes` under `primary`, retrying once with `fallback`.
///
/// "Fails" means the decoder reported malformed sequences for that
/// encoding; replacement-character output is never silently accepted.
fn decode_text<'a>(
    bytes: &'a [u8],
    primary: &'static Encoding,
    fallback: &'static Encoding,
) -> IngestResult<Cow<'a, str>> {
    let (text, _, had_errors) = primary.decode(bytes);
    if !had_errors {
        return Ok(text);
    }

    let (text, _, had_errors) = fallback.decode(bytes);
    if !had_errors {
        return Ok(text);
    }

    Err(IngestError::Decode {
        primary: primary.name(),
        fallback: fallback.name(),
    })
}
