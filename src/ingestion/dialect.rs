//! Structural dialect detection for delimited text.
//!
//! The sniffer inspects a fixed-size leading sample of the decoded source
//! and scores candidate delimiters by how consistently they occur across
//! sample lines. Detection is best-effort by design: an inconclusive sample
//! yields `None` and the caller falls back to [`Dialect::default`], so
//! detection failure is never fatal to ingestion.

/// Structural parameters of one delimited-text source.
///
/// Derived once per source from the leading sample and never re-derived
/// mid-parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Quote byte.
    pub quote: u8,
    /// Whether the first row carries column labels.
    pub has_headers: bool,
}

impl Default for Dialect {
    /// The fallback dialect: comma-delimited, double-quoted, header present.
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            has_headers: true,
        }
    }
}

/// Number of leading bytes of decoded text the sniffer inspects.
pub const SAMPLE_LEN: usize = 1024;

const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Detect the dialect of `sample`, the leading [`SAMPLE_LEN`] bytes of a
/// decoded source.
///
/// A delimiter wins by appearing on every sample line, preferring one whose
/// per-line count never varies. Headers are judged from the first row: a
/// row carrying numeric-looking cells is taken as data, a text-only row
/// above the rest as labels. Returns `None` when no candidate delimiter
/// appears on every line.
pub fn sniff_dialect(sample: &str) -> Option<Dialect> {
    let lines = sample_lines(sample);
    if lines.is_empty() {
        return None;
    }

    let delimiter = detect_delimiter(&lines)?;
    let has_headers = detect_headers(lines[0], delimiter);
    Some(Dialect {
        delimiter,
        quote: b'"',
        has_headers,
    })
}

/// Non-blank sample lines. The sample may cut the source mid-line; an
/// incomplete trailing line would skew the counts, so it is dropped when
/// the sample holds more than one line.
fn sample_lines(sample: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = sample.lines().collect();
    if !sample.ends_with('\n') && lines.len() > 1 {
        lines.pop();
    }
    lines.retain(|line| !line.trim().is_empty());
    lines
}

fn detect_delimiter(lines: &[&str]) -> Option<u8> {
    let mut consistent: Vec<(u8, usize)> = Vec::new();
    let mut uneven: Vec<(u8, usize)> = Vec::new();

    for &candidate in &CANDIDATE_DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_unquoted(line, candidate))
            .collect();
        let min = counts.iter().copied().min().unwrap_or(0);
        if min == 0 {
            continue;
        }
        if counts.iter().all(|&c| c == counts[0]) {
            consistent.push((candidate, counts[0]));
        } else {
            uneven.push((candidate, min));
        }
    }

    pick_best(&consistent).or_else(|| pick_best(&uneven))
}

/// Highest count wins; ties keep the earliest candidate, so comma beats the
/// rarer delimiters when the sample is ambiguous.
fn pick_best(scored: &[(u8, usize)]) -> Option<u8> {
    let mut best: Option<(u8, usize)> = None;
    for &(delimiter, count) in scored {
        if best.is_none_or(|(_, n)| count > n) {
            best = Some((delimiter, count));
        }
    }
    best.map(|(delimiter, _)| delimiter)
}

fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for &byte in line.as_bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
        } else if byte == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

fn detect_headers(first_line: &str, delimiter: u8) -> bool {
    !split_unquoted(first_line, delimiter)
        .iter()
        .any(|cell| looks_numeric(cell))
}

fn looks_numeric(cell: &str) -> bool {
    let trimmed = cell.trim().trim_matches('"');
    !trimmed.is_empty() && trimmed.parse::<f64>().is_ok()
}

/// Split on unquoted delimiter occurrences. Both the delimiter and the
/// quote are ASCII, so byte-index slicing stays on char boundaries.
fn split_unquoted(line: &str, delimiter: u8) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    for (i, &byte) in line.as_bytes().iter().enumerate() {
        if byte == b'"' {
            in_quotes = !in_quotes;
        } else if byte == delimiter && !in_quotes {
            fields.push(&line[start..i]);
            start = i + 1;
        }
    }
    fields.push(&line[start..]);
    fields
}
