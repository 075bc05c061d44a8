use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Error type returned by ingestion functions.
///
/// Only source-access and whole-container failures reach callers; dialect
/// detection falls back to a default and per-name resolution failures in
/// workbooks are recovered by omission.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Underlying I/O error (e.g. source file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited-text parsing error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "excel")]
    /// The workbook container could not be opened or read (feature-gated
    /// behind `excel`).
    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    /// The source text is malformed under both configured encodings.
    ///
    /// Raised only after the one designated fallback encoding also fails;
    /// there is no third attempt.
    #[error("undecodable text: tried {primary}, then {fallback}")]
    Decode {
        /// Name of the primary encoding attempted.
        primary: &'static str,
        /// Name of the fallback encoding attempted.
        fallback: &'static str,
    },

    /// The source format has no ingestion support.
    #[error("unsupported source format: {extension}")]
    UnsupportedFormat {
        /// The offending file extension (or a note when none was present).
        extension: String,
    },
}
