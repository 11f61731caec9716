//! The `mailqa preview` command: inspect a file before asking about it.

use clap::Args;
use mailqa_core::{ingest, select, Config, Dataset, Row, SelectionMode};
use std::io::{self, Write};
use std::path::PathBuf;

/// Rows shown when neither `--limit` nor `--all` is given.
const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Arguments for the `preview` command.
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// CSV, TSV or Excel file with one email per row
    #[arg(required = true)]
    pub input: PathBuf,

    /// Only show these rows: "all", "2-5" or "1,3,4"
    #[arg(short, long)]
    pub rows: Option<SelectionMode>,

    /// Maximum number of rows to show
    #[arg(short, long, default_value_t = DEFAULT_PREVIEW_ROWS, conflicts_with = "all")]
    pub limit: usize,

    /// Show every row
    #[arg(long)]
    pub all: bool,

    /// Column holding the email text (defaults to `ingest.text_column`)
    #[arg(long)]
    pub text_column: Option<String>,

    /// Worksheet to read from spreadsheet files
    #[arg(long)]
    pub sheet: Option<String>,
}

/// Execute the preview command.
pub fn execute(args: PreviewArgs, config: &Config) -> anyhow::Result<()> {
    let mut ingest_config = config.ingest.clone();
    if let Some(ref column) = args.text_column {
        ingest_config.text_column = column.clone();
    }
    if args.sheet.is_some() {
        ingest_config.sheet = args.sheet.clone();
    }

    let dataset = ingest::load(&args.input, &ingest_config)?;
    let limit = if args.all { None } else { Some(args.limit) };
    let rows = preview_rows(&dataset, args.rows.as_ref(), limit)?;

    let stdout = io::stdout();
    render(&dataset, &rows, &mut stdout.lock())?;
    Ok(())
}

/// The rows to show: the selection (or the whole dataset), capped at `limit`.
pub(crate) fn preview_rows<'a>(
    dataset: &'a Dataset,
    selection: Option<&SelectionMode>,
    limit: Option<usize>,
) -> anyhow::Result<Vec<&'a Row>> {
    let mut rows = match selection {
        Some(mode) => select(dataset, mode)?,
        None => dataset.rows().iter().collect(),
    };
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    Ok(rows)
}

/// Write a header line followed by one block per row.
pub(crate) fn render<W: Write>(dataset: &Dataset, rows: &[&Row], out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "{} row(s), columns: {}",
        dataset.len(),
        dataset.columns().join(", ")
    )?;
    for row in rows {
        writeln!(out)?;
        writeln!(out, "Email {}:", row.number)?;
        writeln!(out, "{}", row.text().unwrap_or("(no text)"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::from_texts(
            (1..=8).map(|i| if i == 2 { None } else { Some(format!("email {i}")) }),
            "Email Body",
        )
    }

    #[test]
    fn default_limit_shows_head() {
        let ds = dataset();
        let rows = preview_rows(&ds, None, Some(DEFAULT_PREVIEW_ROWS)).unwrap();
        let numbers: Vec<usize> = rows.iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn selection_is_applied_before_limit() {
        let ds = dataset();
        let mode: SelectionMode = "7,3,8".parse().unwrap();
        let rows = preview_rows(&ds, Some(&mode), Some(2)).unwrap();
        let numbers: Vec<usize> = rows.iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![7, 3]);

        assert_eq!(preview_rows(&ds, None, None).unwrap().len(), 8);
    }

    #[test]
    fn invalid_selection_is_reported() {
        let ds = dataset();
        let mode = SelectionMode::Range { start: 5, end: 20 };
        assert!(preview_rows(&ds, Some(&mode), None).is_err());
    }

    #[test]
    fn render_marks_missing_text() {
        let ds = dataset();
        let rows = preview_rows(&ds, None, Some(2)).unwrap();
        let mut out = Vec::new();
        render(&ds, &rows, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "8 row(s), columns: Email Body\n\nEmail 1:\nemail 1\n\nEmail 2:\n(no text)\n"
        );
    }
}
