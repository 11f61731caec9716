//! Caller-owned session context for the three-step flow.
//!
//! ```text
//! Upload ──next──▶ Select ──next──▶ Question
//!        ◀──back──        ◀──back──
//! ```
//!
//! The session holds the loaded dataset and the current selection. Each
//! step's inputs are passed explicitly; nothing lives in globals.

use crate::answer::{run_batch, AnswerGenerator, BatchOptions, BatchReport, Query, RowOutcome};
use crate::config::IngestConfig;
use crate::dataset::{Dataset, Row};
use crate::error::{self, IngestError, SelectionError};
use crate::ingest;
use crate::selection::{self, SelectionMode};
use std::path::Path;

/// The step the user is currently on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    Upload,
    Select,
    Question,
}

impl Step {
    pub fn title(&self) -> &'static str {
        match self {
            Step::Upload => "Step 1: Upload Emails",
            Step::Select => "Step 2: Select Emails for Question Answering",
            Step::Question => "Step 3: Ask a Question and Get Answers",
        }
    }
}

/// State carried between the upload, select and question steps.
#[derive(Debug, Default)]
pub struct Session {
    step: Step,
    dataset: Option<Dataset>,
    selection: Option<SelectionMode>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn selection(&self) -> Option<&SelectionMode> {
        self.selection.as_ref()
    }

    /// Load a dataset from disk, replacing any previous one.
    ///
    /// A failed upload leaves no dataset loaded, so the session can't move
    /// on to selection until a file loads cleanly. Either way the selection
    /// is cleared, since its indices referred to the old rows.
    pub fn load_file(
        &mut self,
        path: &Path,
        config: &IngestConfig,
    ) -> Result<&Dataset, IngestError> {
        match ingest::load(path, config) {
            Ok(dataset) => Ok(self.set_dataset(dataset)),
            Err(e) => {
                self.dataset = None;
                self.selection = None;
                Err(e)
            }
        }
    }

    /// Install an already-parsed dataset.
    pub fn set_dataset(&mut self, dataset: Dataset) -> &Dataset {
        self.selection = None;
        self.dataset.insert(dataset)
    }

    /// Validate and store a selection against the loaded dataset.
    ///
    /// An invalid selection is rejected and the previous one is kept.
    pub fn apply_selection(&mut self, mode: SelectionMode) -> Result<usize, SelectionError> {
        let dataset = self.dataset.as_ref().ok_or(SelectionError::NoDataLoaded)?;
        let count = selection::select(dataset, &mode)?.len();
        self.selection = Some(mode);
        Ok(count)
    }

    /// Rows of the current selection, in selection order.
    pub fn selected_rows(&self) -> Result<Vec<&Row>, SelectionError> {
        let dataset = self.dataset.as_ref().ok_or(SelectionError::NoDataLoaded)?;
        let mode = self.selection.as_ref().ok_or(SelectionError::NoSelection)?;
        let rows = selection::select(dataset, mode)?;
        if rows.is_empty() {
            return Err(SelectionError::NoSelection);
        }
        Ok(rows)
    }

    /// Move forward one step if the current step's requirements are met.
    pub fn next(&mut self) -> Result<Step, SelectionError> {
        self.step = match self.step {
            Step::Upload => {
                match &self.dataset {
                    Some(ds) if !ds.is_empty() => {}
                    _ => return Err(SelectionError::NoDataLoaded),
                }
                // Fresh visits to the select step start from "all rows"
                if self.selection.is_none() {
                    self.selection = Some(SelectionMode::All);
                }
                Step::Select
            }
            Step::Select => {
                self.selected_rows()?;
                Step::Question
            }
            Step::Question => Step::Question,
        };
        Ok(self.step)
    }

    /// Move back one step. Always allowed; state is kept.
    pub fn back(&mut self) -> Step {
        self.step = match self.step {
            Step::Upload | Step::Select => Step::Upload,
            Step::Question => Step::Select,
        };
        self.step
    }

    /// Answer `query` for the current selection.
    ///
    /// Results are produced fresh on every call and not retained.
    pub async fn answer<F>(
        &self,
        generator: &AnswerGenerator,
        query: &Query,
        options: &BatchOptions,
        on_outcome: F,
    ) -> error::Result<BatchReport>
    where
        F: FnMut(RowOutcome<'_>),
    {
        let rows = self.selected_rows()?;
        run_batch(generator, &rows, query, options, on_outcome).await
    }
}
