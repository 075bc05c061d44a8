//! Unified ingestion entrypoints.
//!
//! Most callers should use [`ingest_records_from_path`], which infers the
//! source format from the file extension (or honors
//! [`IngestOptions::format`]), dispatches to the delimited or workbook
//! pipeline, and reports the outcome to a configured observer.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

use crate::error::{IngestError, IngestResult};
use crate::ingestion::delimited;
use crate::ingestion::dialect::Dialect;
use crate::ingestion::observability::{IngestContext, IngestObserver, IngestStats, Severity};
use crate::types::RecordSet;

#[cfg(feature = "excel")]
use crate::types::NamedRangeTable;

/// Declared or inferred kind of a raw source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Delimited text (comma/semicolon/tab, sniffed).
    Delimited,
    /// Workbook-structured spreadsheet.
    Workbook,
}

impl SourceFormat {
    /// Infer a source format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "tsv" | "txt" => Some(Self::Delimited),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Workbook),
            _ => None,
        }
    }
}

/// Options controlling ingestion behavior.
///
/// Use [`Default`] for common cases: format inferred from the extension,
/// dialect sniffed, UTF-8 with a windows-1252 fallback, first worksheet, no
/// observer.
#[derive(Clone)]
pub struct IngestOptions {
    /// If `None`, infer the format from the file extension.
    pub format: Option<SourceFormat>,
    /// Force a dialect instead of sniffing (delimited sources only).
    pub dialect: Option<Dialect>,
    /// Primary text encoding for delimited sources.
    pub primary_encoding: &'static Encoding,
    /// Fallback encoding, tried once when the primary reports malformed
    /// input.
    pub fallback_encoding: &'static Encoding,
    /// Worksheet to ingest for workbook grids; first sheet if `None`.
    pub sheet: Option<String>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            format: None,
            dialect: None,
            primary_encoding: UTF_8,
            fallback_encoding: WINDOWS_1252,
            sheet: None,
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

impl fmt::Debug for IngestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestOptions")
            .field("format", &self.format)
            .field("dialect", &self.dialect)
            .field("primary_encoding", &self.primary_encoding.name())
            .field("fallback_encoding", &self.fallback_encoding.name())
            .field("sheet", &self.sheet)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

/// Unified entry point for path-based record ingestion.
///
/// - Delimited sources run through sniffing, header normalization, and row
///   coercion.
/// - Workbook sources ingest one worksheet grid (see
///   [`IngestOptions::sheet`]).
///
/// When an observer is configured, this function reports `on_success` with
/// row counts, `on_failure` with a computed severity, and `on_alert` when
/// that severity meets `options.alert_at_or_above`.
pub fn ingest_records_from_path(
    path: impl AsRef<Path>,
    options: &IngestOptions,
) -> IngestResult<RecordSet> {
    let path = path.as_ref();
    let format = match options.format {
        Some(format) => format,
        None => infer_format(path)?,
    };
    let ctx = IngestContext {
        path: path.to_path_buf(),
        format,
    };

    let result = match format {
        SourceFormat::Delimited => delimited::ingest_delimited_from_path(path, options),
        SourceFormat::Workbook => ingest_workbook_dispatch(path, options),
    };

    report_outcome(
        options,
        &ctx,
        result.as_ref().map(|set| IngestStats {
            rows: set.row_count(),
        }),
    );
    result
}

/// Resolve a workbook pro-forma's defined names, reporting the outcome to a
/// configured observer. Stats carry the count of names that resolved.
#[cfg(feature = "excel")]
pub fn extract_proforma_from_path(
    path: impl AsRef<Path>,
    options: &IngestOptions,
) -> IngestResult<NamedRangeTable> {
    let path = path.as_ref();
    let ctx = IngestContext {
        path: path.to_path_buf(),
        format: SourceFormat::Workbook,
    };

    let result = super::workbook::extract_named_ranges_from_path(path);
    report_outcome(
        options,
        &ctx,
        result.as_ref().map(|table| IngestStats { rows: table.len() }),
    );
    result
}

fn report_outcome(
    options: &IngestOptions,
    ctx: &IngestContext,
    outcome: Result<IngestStats, &IngestError>,
) {
    let Some(observer) = options.observer.as_ref() else {
        return;
    };
    match outcome {
        Ok(stats) => observer.on_success(ctx, stats),
        Err(error) => {
            let severity = severity_for_error(error);
            observer.on_failure(ctx, severity, error);
            if severity >= options.alert_at_or_above {
                observer.on_alert(ctx, severity, error);
            }
        }
    }
}

fn severity_for_error(error: &IngestError) -> Severity {
    match error {
        IngestError::Io(_) => Severity::Critical,
        IngestError::Csv(err) => match err.kind() {
            csv::ErrorKind::Io(_) => Severity::Critical,
            _ => Severity::Error,
        },
        #[cfg(feature = "excel")]
        IngestError::Workbook(err) => match err {
            calamine::Error::Io(_) => Severity::Critical,
            _ => Severity::Error,
        },
        IngestError::Decode { .. } => Severity::Error,
        IngestError::UnsupportedFormat { .. } => Severity::Error,
    }
}

fn infer_format(path: &Path) -> IngestResult<SourceFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| IngestError::UnsupportedFormat {
            extension: format!("(no extension: {})", path.display()),
        })?;

    SourceFormat::from_extension(ext).ok_or_else(|| IngestError::UnsupportedFormat {
        extension: ext.to_string(),
    })
}

fn ingest_workbook_dispatch(path: &Path, options: &IngestOptions) -> IngestResult<RecordSet> {
    // Avoid unused warnings when the feature is off.
    let _ = (path, options);

    #[cfg(feature = "excel")]
    {
        super::workbook::ingest_workbook_from_path(path, options.sheet.as_deref())
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(IngestError::UnsupportedFormat {
            extension: "workbook (enable cargo feature 'excel')".to_string(),
        })
    }
}
