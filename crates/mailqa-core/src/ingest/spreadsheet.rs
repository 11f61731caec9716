//! Excel / OpenDocument workbook import via calamine.

use crate::dataset::Dataset;
use crate::error::IngestError;
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDate, TimeDelta};
use std::path::Path;

/// Load the named sheet (or the first one) of a workbook as a dataset.
///
/// The first row of the used range is the header.
pub(super) fn load(
    path: &Path,
    sheet: Option<&str>,
    text_column: &str,
) -> Result<Dataset, IngestError> {
    let file_error = |message: String| IngestError::FileRead {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| file_error(e.to_string()))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| file_error("workbook contains no sheets".to_string()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| file_error(format!("sheet '{sheet_name}': {e}")))?;

    let mut rows = range.rows();
    let columns: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(cell_to_string).collect(),
        None => return Err(file_error(format!("sheet '{sheet_name}' is empty"))),
    };

    let records: Vec<Vec<String>> = rows
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    tracing::debug!(
        "Read sheet '{}' ({} data rows) from {:?}",
        sheet_name,
        records.len(),
        path
    );
    Dataset::from_records(columns, records, text_column)
}

/// Render a cell as the text a user would see in the sheet.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => serial_to_text(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{e:?}"),
    }
}

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Render an Excel date serial (1900 system) as `YYYY-MM-DD`, `HH:MM:SS`, or
/// both, depending on whether it has a date part, a time part, or both.
fn serial_to_text(serial: f64) -> String {
    let has_date = serial.floor() > 0.0;
    let has_time = serial.fract().abs() > 0.0001;

    // Day 0 is 1899-12-30 so that serials after the phantom 1900-02-29 line up
    let datetime = NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|epoch| epoch.and_hms_opt(0, 0, 0))
        .zip(TimeDelta::try_seconds((serial * SECONDS_PER_DAY).round() as i64))
        .and_then(|(epoch, offset)| epoch.checked_add_signed(offset));

    let Some(datetime) = datetime.filter(|_| serial >= 0.0) else {
        return serial.to_string();
    };

    let format = if has_date && has_time {
        "%Y-%m-%d %H:%M:%S"
    } else if has_time {
        "%H:%M:%S"
    } else {
        "%Y-%m-%d"
    };
    datetime.format(format).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_floats_render_without_fraction() {
        assert_eq!(cell_to_string(&Data::Float(3.0)), "3");
        assert_eq!(cell_to_string(&Data::Float(2.5)), "2.5");
    }

    #[test]
    fn date_serials_render_as_dates() {
        assert_eq!(serial_to_text(45292.0), "2024-01-01");
        assert_eq!(serial_to_text(45292.5), "2024-01-01 12:00:00");
        assert_eq!(serial_to_text(0.75), "18:00:00");
    }

    #[test]
    fn iso_dates_are_kept_verbatim() {
        assert_eq!(
            cell_to_string(&Data::DateTimeIso("2024-01-01T09:30:00".to_string())),
            "2024-01-01T09:30:00"
        );
    }

    #[test]
    fn scalars_render_as_text() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::Int(42)), "42");
        assert_eq!(cell_to_string(&Data::Bool(true)), "true");
        assert_eq!(
            cell_to_string(&Data::String("Hello".to_string())),
            "Hello"
        );
    }
}
