//! In-memory tabular dataset of emails.
//!
//! A dataset is created once per upload and lives for the whole session.
//! Each row remembers its 1-based position so selections and results can
//! refer back to the row the user saw.

use crate::error::IngestError;
use serde::Serialize;
use std::collections::BTreeMap;

/// One record of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    /// 1-based position in the dataset
    pub number: usize,

    /// Cell values keyed by column name (absent cells are omitted)
    pub values: BTreeMap<String, String>,

    /// Content of the text column, `None` when absent or blank
    text: Option<String>,
}

impl Row {
    /// The row's email text, or `None` if the cell is missing or blank.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Value of an arbitrary column, or `None` if missing or blank.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

/// An ordered sequence of rows sharing one header.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
    text_column: String,
}

impl Dataset {
    /// Build a dataset from a header and raw records.
    ///
    /// Records shorter than the header are padded with missing values,
    /// extra trailing cells are ignored. Fails with `IngestError::Schema`
    /// when `text_column` is not among the header cells.
    pub fn from_records(
        columns: Vec<String>,
        records: Vec<Vec<String>>,
        text_column: &str,
    ) -> Result<Self, IngestError> {
        let columns: Vec<String> = columns.into_iter().map(|c| c.trim().to_string()).collect();
        if !columns.iter().any(|c| c == text_column) {
            return Err(IngestError::Schema {
                column: text_column.to_string(),
                found: columns,
            });
        }

        let rows = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| {
                let values: BTreeMap<String, String> = columns
                    .iter()
                    .zip(record)
                    .filter(|(name, _)| !name.is_empty())
                    .map(|(name, value)| (name.clone(), value))
                    .collect();
                let text = values
                    .get(text_column)
                    .filter(|v| !v.trim().is_empty())
                    .cloned();
                Row {
                    number: i + 1,
                    values,
                    text,
                }
            })
            .collect();

        Ok(Self {
            columns,
            rows,
            text_column: text_column.to_string(),
        })
    }

    /// Build a single-column dataset of email bodies.
    ///
    /// `None` entries become rows with a missing text cell.
    pub fn from_texts<I, S>(texts: I, text_column: &str) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let rows = texts
            .into_iter()
            .enumerate()
            .map(|(i, t)| {
                let mut values = BTreeMap::new();
                if let Some(t) = t {
                    values.insert(text_column.to_string(), t.into());
                }
                let text = values
                    .get(text_column)
                    .filter(|v| !v.trim().is_empty())
                    .cloned();
                Row {
                    number: i + 1,
                    values,
                    text,
                }
            })
            .collect();

        Self {
            columns: vec![text_column.to_string()],
            rows,
            text_column: text_column.to_string(),
        }
    }

    /// Column names in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Name of the column answers are generated from.
    pub fn text_column(&self) -> &str {
        &self.text_column
    }

    /// All rows in dataset order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Look up a row by its 1-based number.
    pub fn row(&self, number: usize) -> Option<&Row> {
        number.checked_sub(1).and_then(|i| self.rows.get(i))
    }

    /// The first `n` rows, for previews.
    pub fn head(&self, n: usize) -> &[Row] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
