//! Row selection: choose which rows of a dataset to answer questions about.
//!
//! Indices are 1-based, as shown to the user. Out-of-range or malformed
//! parameters are rejected, never clamped.

use crate::dataset::{Dataset, Row};
use crate::error::SelectionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How rows are chosen from the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SelectionMode {
    /// Every row, in dataset order
    #[default]
    All,
    /// Closed interval `[start, end]`, 1-based inclusive
    Range { start: usize, end: usize },
    /// Explicit indices in caller order; repeats are kept
    Manual { indices: Vec<usize> },
}

impl SelectionMode {
    /// Resolve this mode to 1-based row numbers, validating against `row_count`.
    pub fn indices(&self, row_count: usize) -> Result<Vec<usize>, SelectionError> {
        match self {
            SelectionMode::All => Ok((1..=row_count).collect()),
            SelectionMode::Range { start, end } => {
                if *start == 0 {
                    return Err(SelectionError::InvalidSelection(
                        "range start must be at least 1".to_string(),
                    ));
                }
                if start > end {
                    return Err(SelectionError::InvalidSelection(format!(
                        "range start {start} is after end {end}"
                    )));
                }
                if *end > row_count {
                    return Err(SelectionError::InvalidSelection(format!(
                        "range end {end} exceeds the {row_count} available row(s)"
                    )));
                }
                Ok((*start..=*end).collect())
            }
            SelectionMode::Manual { indices } => {
                if let Some(bad) = indices.iter().find(|&&i| i == 0 || i > row_count) {
                    return Err(SelectionError::InvalidSelection(format!(
                        "row {bad} is outside 1..={row_count}"
                    )));
                }
                Ok(indices.clone())
            }
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::All => write!(f, "all"),
            SelectionMode::Range { start, end } => write!(f, "{start}-{end}"),
            SelectionMode::Manual { indices } => {
                let parts: Vec<String> = indices.iter().map(|i| i.to_string()).collect();
                write!(f, "{}", parts.join(","))
            }
        }
    }
}

/// Parses `all`, `N-M` (range) and `a,b,c` (manual; a single number is a
/// one-row manual selection).
impl FromStr for SelectionMode {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(SelectionMode::All);
        }
        if s.is_empty() {
            return Ok(SelectionMode::Manual { indices: vec![] });
        }

        if let Some((start, end)) = s.split_once('-') {
            return Ok(SelectionMode::Range {
                start: parse_index(start)?,
                end: parse_index(end)?,
            });
        }

        let indices = s
            .split(',')
            .map(parse_index)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SelectionMode::Manual { indices })
    }
}

fn parse_index(s: &str) -> Result<usize, SelectionError> {
    s.trim()
        .parse::<usize>()
        .map_err(|_| SelectionError::InvalidSelection(format!("'{}' is not a row number", s.trim())))
}

/// Select rows from `dataset` according to `mode`.
///
/// Preserves dataset order for `All` and `Range`, and caller order
/// (including repeats) for `Manual`.
pub fn select<'a>(dataset: &'a Dataset, mode: &SelectionMode) -> Result<Vec<&'a Row>, SelectionError> {
    if dataset.is_empty() {
        return Err(SelectionError::NoDataLoaded);
    }

    let rows = mode
        .indices(dataset.len())?
        .into_iter()
        .filter_map(|n| dataset.row(n))
        .collect::<Vec<_>>();

    tracing::debug!("Selection '{}' resolved to {} row(s)", mode, rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(n: usize) -> Dataset {
        Dataset::from_texts((1..=n).map(|i| Some(format!("email {i}"))), "Email Body")
    }

    fn numbers(rows: &[&Row]) -> Vec<usize> {
        rows.iter().map(|r| r.number).collect()
    }

    #[test]
    fn all_returns_every_row_in_order() {
        let ds = dataset(4);
        let rows = select(&ds, &SelectionMode::All).unwrap();
        assert_eq!(numbers(&rows), vec![1, 2, 3, 4]);
    }

    #[test]
    fn range_is_inclusive() {
        let ds = dataset(5);
        let rows = select(&ds, &SelectionMode::Range { start: 2, end: 4 }).unwrap();
        assert_eq!(numbers(&rows), vec![2, 3, 4]);
    }

    #[test]
    fn single_row_range() {
        let ds = dataset(3);
        let rows = select(&ds, &SelectionMode::Range { start: 2, end: 2 }).unwrap();
        assert_eq!(numbers(&rows), vec![2]);
        assert_eq!(rows[0].text(), Some("email 2"));
    }

    #[test]
    fn every_valid_range_matches_positions() {
        let ds = dataset(6);
        for start in 1..=6 {
            for end in start..=6 {
                let rows = select(&ds, &SelectionMode::Range { start, end }).unwrap();
                assert_eq!(numbers(&rows), (start..=end).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn range_start_after_end_is_invalid() {
        let ds = dataset(5);
        let err = select(&ds, &SelectionMode::Range { start: 4, end: 2 }).unwrap_err();
        assert!(matches!(err, SelectionError::InvalidSelection(_)));
    }

    #[test]
    fn range_out_of_bounds_is_invalid() {
        let ds = dataset(3);
        assert!(matches!(
            select(&ds, &SelectionMode::Range { start: 0, end: 2 }),
            Err(SelectionError::InvalidSelection(_))
        ));
        assert!(matches!(
            select(&ds, &SelectionMode::Range { start: 2, end: 4 }),
            Err(SelectionError::InvalidSelection(_))
        ));
    }

    #[test]
    fn manual_keeps_caller_order_and_repeats() {
        let ds = dataset(3);
        let rows = select(&ds, &SelectionMode::Manual { indices: vec![3, 1] }).unwrap();
        assert_eq!(numbers(&rows), vec![3, 1]);

        let rows = select(
            &ds,
            &SelectionMode::Manual {
                indices: vec![2, 2, 1, 2],
            },
        )
        .unwrap();
        assert_eq!(numbers(&rows), vec![2, 2, 1, 2]);
    }

    #[test]
    fn manual_out_of_range_is_invalid() {
        let ds = dataset(3);
        for bad in [0, 4] {
            let err = select(
                &ds,
                &SelectionMode::Manual {
                    indices: vec![1, bad],
                },
            )
            .unwrap_err();
            assert!(matches!(err, SelectionError::InvalidSelection(_)));
        }
    }

    #[test]
    fn manual_empty_selects_nothing() {
        let ds = dataset(3);
        let rows = select(&ds, &SelectionMode::Manual { indices: vec![] }).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn empty_dataset_is_no_data_loaded() {
        let ds = dataset(0);
        assert_eq!(
            select(&ds, &SelectionMode::All).unwrap_err(),
            SelectionError::NoDataLoaded
        );
    }

    #[test]
    fn select_is_idempotent() {
        let ds = dataset(4);
        let mode = SelectionMode::Manual {
            indices: vec![4, 2],
        };
        let first = numbers(&select(&ds, &mode).unwrap());
        let second = numbers(&select(&ds, &mode).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn parse_modes() {
        assert_eq!("all".parse::<SelectionMode>().unwrap(), SelectionMode::All);
        assert_eq!("ALL".parse::<SelectionMode>().unwrap(), SelectionMode::All);
        assert_eq!(
            "2-5".parse::<SelectionMode>().unwrap(),
            SelectionMode::Range { start: 2, end: 5 }
        );
        assert_eq!(
            "3, 1,3".parse::<SelectionMode>().unwrap(),
            SelectionMode::Manual {
                indices: vec![3, 1, 3]
            }
        );
        assert_eq!(
            "7".parse::<SelectionMode>().unwrap(),
            SelectionMode::Manual { indices: vec![7] }
        );
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for bad in ["a-b", "1-", "1,,2", "-3", "x"] {
            assert!(
                matches!(
                    bad.parse::<SelectionMode>(),
                    Err(SelectionError::InvalidSelection(_))
                ),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn display_round_trips_through_parse() {
        for mode in [
            SelectionMode::All,
            SelectionMode::Range { start: 1, end: 3 },
            SelectionMode::Manual {
                indices: vec![3, 1],
            },
        ] {
            assert_eq!(mode.to_string().parse::<SelectionMode>().unwrap(), mode);
        }
    }
}
