use encoding_rs::SHIFT_JIS;

use proforma_ingest::IngestError;
use proforma_ingest::ingestion::delimited::ingest_delimited_bytes;
use proforma_ingest::ingestion::{Dialect, IngestOptions, ingest_records_from_path};
use proforma_ingest::types::{CellValue, Record, RecordSet};

fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

fn ingest(input: &str) -> RecordSet {
    ingest_delimited_bytes(input.as_bytes(), &IngestOptions::default()).unwrap()
}

#[test]
fn headered_csv_normalizes_labels_and_values() {
    let set = ingest("Property Name,Units,Purchase Price\nSunset Apartments,150,15000000\n");

    assert_eq!(set.headers.names, ["property_name", "units", "purchase_price"]);
    assert_eq!(set.row_count(), 1);

    let mut expected = Record::new();
    expected.insert("property_name".to_string(), text("Sunset Apartments"));
    expected.insert("units".to_string(), text("150"));
    expected.insert("purchase_price".to_string(), text("15000000"));
    assert_eq!(set.records[0], expected);
}

#[test]
fn ingest_from_path_infers_delimited_by_extension() {
    let set =
        ingest_records_from_path("tests/fixtures/rent_roll.csv", &IngestOptions::default()).unwrap();

    assert_eq!(set.row_count(), 2);
    assert_eq!(
        set.records[0].get("property_name"),
        Some(&text("Sunset Apartments"))
    );
    assert_eq!(set.records[1].get("property_name"), Some(&text("River Lofts")));
}

#[test]
fn headerless_rows_get_positional_labels() {
    let set = ingest("12,Sunset,1500\n14,River,925\n");

    assert_eq!(set.headers.names, ["column_0", "column_1", "column_2"]);
    assert_eq!(set.row_count(), 2);
    assert_eq!(set.records[0].get("column_1"), Some(&text("Sunset")));
    assert_eq!(set.records[1].get("column_2"), Some(&text("925")));
}

#[test]
fn empty_source_yields_empty_set_without_error() {
    let set = ingest("");
    assert!(set.headers.is_empty());
    assert!(set.is_empty());

    let set = ingest("\n\n");
    assert!(set.headers.is_empty());
    assert!(set.is_empty());
}

#[test]
fn blank_rows_are_excluded_from_output() {
    let set = ingest("name,units\nSunset,150\n,\nRiver,88\n");

    // Three input data lines, two surviving records.
    assert_eq!(set.row_count(), 2);
    assert_eq!(set.records[1].get("name"), Some(&text("River")));
}

#[test]
fn short_rows_omit_keys_and_long_rows_drop_extras() {
    let set = ingest("a,b,c\n1,2\n1,2,3,4\n");

    assert_eq!(set.headers.len(), 3);
    assert_eq!(set.records[0].len(), 2);
    assert_eq!(set.records[0].get("c"), None);
    assert_eq!(set.records[1].len(), 3);
    assert_eq!(set.records[1].get("c"), Some(&text("3")));
}

#[test]
fn duplicate_header_keeps_the_later_column() {
    let set = ingest("amount,amount\n1,2\n");

    assert_eq!(set.headers.names, ["amount", "amount"]);
    assert_eq!(set.records[0].len(), 1);
    assert_eq!(set.records[0].get("amount"), Some(&text("2")));
}

#[test]
fn whitespace_cell_is_preserved_as_empty_text() {
    let set = ingest("a,b\n   ,x\n");

    let cell = set.records[0].get("a").unwrap();
    assert!(!cell.is_missing());
    assert_eq!(cell, &text(""));
}

#[test]
fn semicolon_and_tab_dialects_are_sniffed() {
    let set = ingest("name;units\nSunset;150\n");
    assert_eq!(set.headers.names, ["name", "units"]);
    assert_eq!(set.records[0].get("units"), Some(&text("150")));

    let set = ingest("name\tunits\nSunset\t150\n");
    assert_eq!(set.headers.names, ["name", "units"]);
}

#[test]
fn quoted_fields_keep_embedded_delimiters() {
    let set = ingest("name,notes\nSunset,\"150 units, phase 2\"\n");
    assert_eq!(set.records[0].get("notes"), Some(&text("150 units, phase 2")));
}

#[test]
fn crlf_line_endings_are_handled() {
    let set = ingest("name,units\r\nSunset,150\r\n");
    assert_eq!(set.headers.names, ["name", "units"]);
    assert_eq!(set.records[0].get("units"), Some(&text("150")));
}

#[test]
fn reingestion_is_idempotent() {
    let input = "Property Name,Units\nSunset Apartments,150\nRiver Lofts,88\n";
    assert_eq!(ingest(input), ingest(input));
}

#[test]
fn non_utf8_bytes_fall_back_to_windows_1252() {
    let set =
        ingest_delimited_bytes(b"name\ncaf\xe9 lofts\n", &IngestOptions::default()).unwrap();
    assert_eq!(set.records[0].get("name"), Some(&text("caf\u{e9} lofts")));
}

#[test]
fn decode_failure_names_both_encodings() {
    let options = IngestOptions {
        fallback_encoding: SHIFT_JIS,
        ..Default::default()
    };

    let err = ingest_delimited_bytes(b"units\n\xff\xfe\xff\n", &options).unwrap_err();
    match &err {
        IngestError::Decode { primary, fallback } => {
            assert_eq!(*primary, "UTF-8");
            assert_eq!(*fallback, "Shift_JIS");
        }
        other => panic!("expected decode error, got {other:?}"),
    }
    let msg = err.to_string();
    assert!(msg.contains("UTF-8"));
    assert!(msg.contains("Shift_JIS"));
}

#[test]
fn forced_dialect_skips_sniffing() {
    let options = IngestOptions {
        dialect: Some(Dialect {
            delimiter: b'|',
            quote: b'"',
            has_headers: false,
        }),
        ..Default::default()
    };

    let set = ingest_delimited_bytes(b"Sunset|150\n", &options).unwrap();
    assert_eq!(set.headers.names, ["column_0", "column_1"]);
    assert_eq!(set.records[0].get("column_1"), Some(&text("150")));
}

#[test]
fn unsupported_extension_is_an_explicit_error() {
    let err = ingest_records_from_path("deck.pdf", &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
    assert!(err.to_string().contains("pdf"));
}

#[test]
fn missing_file_surfaces_io_error() {
    let err = ingest_records_from_path(
        "tests/fixtures/does_not_exist.csv",
        &IngestOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, IngestError::Io(_)));
}

#[test]
fn records_serialize_as_plain_json_objects() {
    let set = ingest("Property Name,Units\nSunset Apartments,150\n");
    let json = serde_json::to_value(&set.records[0]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"property_name": "Sunset Apartments", "units": "150"})
    );
}
