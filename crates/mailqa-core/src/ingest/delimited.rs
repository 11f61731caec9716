//! CSV/TSV parsing with delimiter sniffing.

use crate::dataset::Dataset;
use crate::error::IngestError;
use std::borrow::Cow;
use std::io::Read;
use std::path::PathBuf;

/// Candidate delimiters, in tie-break order.
const CANDIDATES: &[u8] = &[b'\t', b';', b',', b'|'];

/// Lines inspected when sniffing the delimiter.
const SNIFF_LINES: usize = 10;

/// Read a delimited dataset from any reader (sniffing the delimiter when
/// `delimiter` is `None`).
pub fn read_delimited<R: Read>(
    mut reader: R,
    delimiter: Option<u8>,
    text_column: &str,
) -> Result<Dataset, IngestError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| read_error(e.to_string()))?;
    parse(&bytes, delimiter, text_column)
}

pub(super) fn parse(
    bytes: &[u8],
    delimiter: Option<u8>,
    text_column: &str,
) -> Result<Dataset, IngestError> {
    let content = decode(bytes);
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(content));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| read_error(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();
    if columns.is_empty() {
        return Err(read_error("file is empty".to_string()));
    }

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| read_error(e.to_string()))?;
        records.push(record.iter().map(str::to_string).collect());
    }

    Dataset::from_records(columns, records, text_column)
}

/// Decode as UTF-8, falling back to Windows-1252 (common for Excel-exported CSVs).
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => {
            tracing::debug!("Input is not valid UTF-8, decoding as Windows-1252");
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded
        }
    }
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate, count fields per line. The delimiter that produces the
/// most consistent field count (>1 field) wins. Single-column files fall back
/// to comma.
fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content.lines().take(SNIFF_LINES).collect();
    if sample.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in CANDIDATES {
        let counts: Vec<usize> = sample
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        let target = counts[0];
        if target <= 1 {
            continue;
        }

        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

// The caller fills in the real path; readers have none.
fn read_error(message: String) -> IngestError {
    IngestError::FileRead {
        path: PathBuf::from("<input>"),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_comma() {
        assert_eq!(sniff_delimiter("a,b,c\n1,2,3\n"), b',');
    }

    #[test]
    fn sniffs_semicolon_over_comma_in_text() {
        let content = "Subject;Email Body\nHi;Hello, how are you?\nRe;Fine, thanks\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn sniffs_tab() {
        assert_eq!(sniff_delimiter("a\tb\n1\t2\n"), b'\t');
    }

    #[test]
    fn single_column_defaults_to_comma() {
        assert_eq!(sniff_delimiter("Email Body\nhello\n"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn reads_quoted_multiline_cells() {
        let csv = "Email Body,Subject\n\"Line one\nLine two\",Greeting\n";
        let ds = read_delimited(csv.as_bytes(), None, "Email Body").unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.rows()[0].text(), Some("Line one\nLine two"));
    }

    #[test]
    fn strips_byte_order_mark() {
        let csv = "\u{feff}Email Body\nhello\n";
        let ds = read_delimited(csv.as_bytes(), None, "Email Body").unwrap();
        assert_eq!(ds.columns(), &["Email Body".to_string()]);
    }

    #[test]
    fn windows_1252_input_is_decoded() {
        let bytes = b"Email Body\n\"Merci, caf\xe9 pr\xeat\"\n";
        let ds = read_delimited(&bytes[..], None, "Email Body").unwrap();
        assert_eq!(ds.rows()[0].text(), Some("Merci, caf\u{e9} pr\u{ea}t"));
    }

    #[test]
    fn utf8_input_is_left_alone() {
        let csv = "Email Body\nMerci, caf\u{e9} pr\u{ea}t \u{20ac}\n";
        let ds = read_delimited(csv.as_bytes(), None, "Email Body").unwrap();
        assert_eq!(ds.rows()[0].text(), Some("Merci, caf\u{e9} pr\u{ea}t \u{20ac}"));
    }

    #[test]
    fn empty_input_is_read_error() {
        let err = read_delimited("".as_bytes(), None, "Email Body").unwrap_err();
        assert!(matches!(err, IngestError::FileRead { .. }));
    }

    #[test]
    fn header_only_gives_empty_dataset() {
        let ds = read_delimited("Email Body\n".as_bytes(), None, "Email Body").unwrap();
        assert!(ds.is_empty());
    }
}
