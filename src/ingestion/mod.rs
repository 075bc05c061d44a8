//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest_records_from_path`] (from [`unified`])
//! which:
//!
//! - infers the source format from the file extension (or you can force a
//!   format via [`IngestOptions`])
//! - normalizes the source into a [`crate::types::RecordSet`]
//! - optionally reports success/failure/alerts to an [`IngestObserver`]
//!
//! The pipeline stages are also available directly under:
//! - [`dialect`]: structural dialect sniffing for delimited text
//! - [`headers`]: header canonicalization and positional synthesis
//! - [`rows`]: row coercion into canonical records
//! - [`delimited`]: the delimited-text pipeline
//! - [`workbook`]: worksheet grids and defined-name extraction (feature
//!   `excel`)

pub mod delimited;
pub mod dialect;
pub mod headers;
pub mod observability;
pub mod rows;
pub mod unified;
#[cfg(feature = "excel")]
pub mod workbook;

pub use dialect::{Dialect, sniff_dialect};
pub use observability::{
    CompositeObserver, IngestContext, IngestObserver, IngestStats, Severity, StdErrObserver,
};
pub use rows::RawCell;
#[cfg(feature = "excel")]
pub use unified::extract_proforma_from_path;
pub use unified::{IngestOptions, SourceFormat, ingest_records_from_path};
