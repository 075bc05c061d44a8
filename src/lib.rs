//! `proforma-ingest` is a small library for normalizing heterogeneous
//! pro-forma sources (delimited text and spreadsheet workbooks) into
//! canonical row records that downstream underwriting layers can rely on.
//!
//! The primary entrypoint is [`ingestion::ingest_records_from_path`], which
//! infers the source format from the file extension (or you can force a
//! format via [`ingestion::IngestOptions`]).
//!
//! ## What you can ingest
//!
//! **Delimited text** (`.csv`, `.tsv`, `.txt`): the structural dialect
//! (delimiter, quoting, header presence) is sniffed from a leading sample,
//! falling back to comma-delimited-with-headers when detection is
//! inconclusive. Text is decoded as UTF-8 with a single windows-1252 retry
//! (both configurable); only when both encodings report malformed input
//! does ingestion fail.
//!
//! **Workbooks** (`.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods`; requires the
//! default Cargo feature `excel`): one worksheet grid ingests into the same
//! record shape, and [`ingestion::workbook::extract_named_ranges_from_path`]
//! resolves a pro-forma's defined names to plain values, skipping entries
//! that no longer resolve.
//!
//! ## Record shape
//!
//! Every normalized row is a mapping from canonical header (trimmed,
//! lowercased, spaces as underscores, or positional `column_N` labels when
//! the source has no header row) to either a trimmed string or an explicit
//! missing marker. Blank separator rows are dropped; short rows keep only
//! the keys that had cells; row order is preserved.
//!
//! ## Quick example: normalize in-memory CSV
//!
//! ```
//! use proforma_ingest::ingestion::IngestOptions;
//! use proforma_ingest::ingestion::delimited::ingest_delimited_bytes;
//! use proforma_ingest::types::CellValue;
//!
//! # fn main() -> Result<(), proforma_ingest::IngestError> {
//! let csv = b"Property Name,Units,Purchase Price\nSunset Apartments,150,15000000\n";
//! let set = ingest_delimited_bytes(csv, &IngestOptions::default())?;
//!
//! assert_eq!(set.headers.names, ["property_name", "units", "purchase_price"]);
//! assert_eq!(set.row_count(), 1);
//! assert_eq!(
//!     set.records[0].get("units"),
//!     Some(&CellValue::Text("150".to_string()))
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Quick example: ingest a file, format inferred by extension
//!
//! ```no_run
//! use proforma_ingest::ingestion::{IngestOptions, ingest_records_from_path};
//!
//! # fn main() -> Result<(), proforma_ingest::IngestError> {
//! let set = ingest_records_from_path("rent_roll.csv", &IngestOptions::default())?;
//! println!("rows={}", set.row_count());
//! # Ok(())
//! # }
//! ```
//!
//! ## Quick example: resolve a pro-forma's named ranges
//!
//! ```no_run
//! use proforma_ingest::ingestion::{IngestOptions, extract_proforma_from_path};
//!
//! # fn main() -> Result<(), proforma_ingest::IngestError> {
//! let table = extract_proforma_from_path("proforma.xlsx", &IngestOptions::default())?;
//! // Names pointing at deleted regions are simply absent.
//! for (name, value) in &table.entries {
//!     println!("{name} = {value:?}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: unified entrypoints and pipeline stages
//! - [`types`]: canonical record and named-range types
//! - [`error`]: error types used across ingestion

pub mod error;
pub mod ingestion;
pub mod types;

pub use error::{IngestError, IngestResult};
