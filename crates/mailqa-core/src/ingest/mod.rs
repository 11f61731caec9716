//! Dataset ingestion from delimited text and spreadsheet files.
//!
//! The only structural contract the rest of the pipeline relies on is the
//! presence of the text column; it is checked here, before any selection
//! or generation can run.

mod delimited;
mod spreadsheet;

pub use delimited::read_delimited;

use crate::config::IngestConfig;
use crate::dataset::Dataset;
use crate::error::IngestError;
use std::path::Path;

/// File families the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Delimiter-separated text; `Some` forces the delimiter, `None` sniffs it
    Delimited(Option<u8>),
    /// Excel or OpenDocument workbook
    Spreadsheet,
}

impl FileKind {
    /// Detect the file kind from the path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" | "txt" => Ok(Self::Delimited(None)),
            "tsv" | "tab" => Ok(Self::Delimited(Some(b'\t'))),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Self::Spreadsheet),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

/// Load a dataset from disk and check it has the configured text column.
pub fn load(path: &Path, config: &IngestConfig) -> Result<Dataset, IngestError> {
    let kind = FileKind::from_path(path)?;
    tracing::debug!("Loading {:?} as {:?}", path, kind);

    let dataset = match kind {
        FileKind::Delimited(delimiter) => {
            let bytes = std::fs::read(path).map_err(|e| IngestError::FileRead {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            delimited::parse(&bytes, delimiter, &config.text_column).map_err(|e| match e {
                IngestError::FileRead { message, .. } => IngestError::FileRead {
                    path: path.to_path_buf(),
                    message,
                },
                other => other,
            })?
        }
        FileKind::Spreadsheet => {
            spreadsheet::load(path, config.sheet.as_deref(), &config.text_column)?
        }
    };

    tracing::info!(
        "Loaded {} row(s) with {} column(s) from {:?}",
        dataset.len(),
        dataset.columns().len(),
        path
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_file_kind_from_extension() {
        assert_eq!(
            FileKind::from_path(Path::new("emails.CSV")).unwrap(),
            FileKind::Delimited(None)
        );
        assert_eq!(
            FileKind::from_path(Path::new("emails.tsv")).unwrap(),
            FileKind::Delimited(Some(b'\t'))
        );
        assert_eq!(
            FileKind::from_path(Path::new("emails.xlsx")).unwrap(),
            FileKind::Spreadsheet
        );
        assert!(matches!(
            FileKind::from_path(Path::new("emails.pdf")),
            Err(IngestError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            FileKind::from_path(Path::new("emails")),
            Err(IngestError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_load_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "emails.csv",
            "Subject,Email Body\nInvoice,\"Hi, when is the invoice due?\"\nBlank,\nShip,Please confirm shipment.\n",
        );

        let ds = load(&path, &IngestConfig::default()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.rows()[0].text(), Some("Hi, when is the invoice due?"));
        assert_eq!(ds.rows()[1].text(), None);
        assert_eq!(ds.rows()[2].text(), Some("Please confirm shipment."));
    }

    #[test]
    fn test_load_csv_without_text_column_is_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "emails.csv", "Subject,Body\nHello,World\n");

        let err = load(&path, &IngestConfig::default()).unwrap_err();
        assert!(matches!(err, IngestError::Schema { .. }));
    }

    #[test]
    fn test_load_windows_1252_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        std::fs::write(&path, b"Email Body\r\n\"Merci, caf\xe9 pr\xeat\"\r\n").unwrap();

        let ds = load(&path, &IngestConfig::default()).unwrap();
        assert_eq!(ds.rows()[0].text(), Some("Merci, caf\u{e9} pr\u{ea}t"));
    }

    #[test]
    fn test_load_custom_text_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "emails.tsv", "Body\tFrom\nHello there\tann@example.com\n");
        let config = IngestConfig {
            text_column: "Body".to_string(),
            sheet: None,
        };

        let ds = load(&path, &config).unwrap();
        assert_eq!(ds.rows()[0].text(), Some("Hello there"));
        assert_eq!(ds.rows()[0].get("From"), Some("ann@example.com"));
    }

    #[test]
    fn test_load_missing_file_is_file_read_error() {
        let err = load(Path::new("/no/such/emails.csv"), &IngestConfig::default()).unwrap_err();
        match err {
            IngestError::FileRead { path, .. } => {
                assert_eq!(path, PathBuf::from("/no/such/emails.csv"))
            }
            other => panic!("expected FileRead, got {other:?}"),
        }
    }

    #[test]
    fn test_load_corrupt_workbook_is_file_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "emails.xlsx", "this is not a zip archive");

        let err = load(&path, &IngestConfig::default()).unwrap_err();
        assert!(matches!(err, IngestError::FileRead { .. }));
    }
}
