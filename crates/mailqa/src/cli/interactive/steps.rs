//! The three wizard steps.

use dialoguer::{Input, MultiSelect, Select};
use mailqa_core::{
    BatchOptions, BatchReport, OutputFormat, OutputWriter, Query, Row, RowOutcome, SelectionMode,
    Verbosity,
};
use std::io::{self, Write};
use std::path::PathBuf;

use crate::cli::ask::create_progress_bar;
use crate::cli::preview;

use super::theme::{print_error, print_note, print_success};
use super::{handle_interrupt, provider, Flow, Wizard};

/// Rows shown by the short preview after a file is loaded.
const PREVIEW_ROWS: usize = 5;

const TYPE_ROWS_LABEL: &str = "Type row numbers (e.g. 3,1,5 or 2-4)";

/// The picker answers in file order; a custom order needs typed row numbers.
const PICK_PROMPT: &str = "Emails to answer (space to toggle, enter to confirm; \
     answered in file order, use \"Type row numbers\" for an order like 3,1)";

/// Characters of email text shown per row in the picker.
const SNIPPET_CHARS: usize = 60;

#[derive(Clone, Copy)]
enum UploadAction {
    Load,
    Preview,
    PreviewAll,
    Next,
    Quit,
}

/// Step 1: load a file and look at it.
pub(super) fn upload(w: &mut Wizard<'_>) -> anyhow::Result<Flow> {
    let mut actions = vec![("Load emails from a file", UploadAction::Load)];
    if let Some(dataset) = w.session.dataset() {
        print_note(format!("{} email(s) loaded", dataset.len()));
        actions.push(("Preview emails", UploadAction::Preview));
        actions.push(("Preview all emails", UploadAction::PreviewAll));
        actions.push(("Next: select emails", UploadAction::Next));
    }
    actions.push(("Quit", UploadAction::Quit));

    let Some(action) = choose(w, "Upload", &actions)? else {
        return Ok(Flow::Quit);
    };

    match action {
        UploadAction::Load => {
            let Some(raw_path) = handle_interrupt(
                Input::<String>::with_theme(&w.theme)
                    .with_prompt("Path to a CSV or Excel file")
                    .interact_text(),
            )?
            else {
                return Ok(Flow::Stay);
            };
            let path = PathBuf::from(shellexpand::tilde(raw_path.trim()).into_owned());

            match w.session.load_file(&path, &w.config.ingest) {
                Ok(dataset) => {
                    print_success(format!(
                        "Loaded {} email(s), columns: {}",
                        dataset.len(),
                        dataset.columns().join(", ")
                    ));
                    show_rows(w, None, Some(PREVIEW_ROWS));
                }
                Err(e) => print_error(e),
            }
            Ok(Flow::Stay)
        }
        UploadAction::Preview => {
            show_rows(w, None, Some(PREVIEW_ROWS));
            Ok(Flow::Stay)
        }
        UploadAction::PreviewAll => {
            show_rows(w, None, None);
            Ok(Flow::Stay)
        }
        UploadAction::Next => Ok(Flow::Next),
        UploadAction::Quit => Ok(Flow::Quit),
    }
}

#[derive(Clone, Copy)]
enum SelectAction {
    All,
    Range,
    Pick,
    Type,
    Preview,
    Back,
    Next,
    Quit,
}

/// Step 2: choose which rows to answer.
pub(super) fn select(w: &mut Wizard<'_>) -> anyhow::Result<Flow> {
    if let Some(mode) = w.session.selection() {
        let count = w.session.selected_rows().map(|rows| rows.len()).unwrap_or(0);
        print_note(format!(
            "Current selection: {} ({count} email(s))",
            describe(mode)
        ));
    }

    let actions = [
        ("All emails", SelectAction::All),
        ("A range of emails", SelectAction::Range),
        ("Pick emails from a list", SelectAction::Pick),
        (TYPE_ROWS_LABEL, SelectAction::Type),
        ("Preview selected emails", SelectAction::Preview),
        ("Back", SelectAction::Back),
        ("Next: ask a question", SelectAction::Next),
        ("Quit", SelectAction::Quit),
    ];
    let Some(action) = choose(w, "Select", &actions)? else {
        return Ok(Flow::Quit);
    };

    let mode = match action {
        SelectAction::All => Some(SelectionMode::All),
        SelectAction::Range => prompt_range(w)?,
        SelectAction::Pick => prompt_pick(w)?,
        SelectAction::Type => prompt_typed(w)?,
        SelectAction::Preview => {
            match w.session.selected_rows() {
                Ok(rows) => render_to_stderr(w, &rows),
                Err(e) => print_error(e),
            }
            None
        }
        SelectAction::Back => return Ok(Flow::Back),
        SelectAction::Next => return Ok(Flow::Next),
        SelectAction::Quit => return Ok(Flow::Quit),
    };

    if let Some(mode) = mode {
        match w.session.apply_selection(mode) {
            Ok(count) => print_success(format!("{count} email(s) selected")),
            Err(e) => print_error(e),
        }
    }
    Ok(Flow::Stay)
}

fn prompt_range(w: &Wizard<'_>) -> anyhow::Result<Option<SelectionMode>> {
    let row_count = w.session.dataset().map(|d| d.len()).unwrap_or(0);

    let Some(start) = handle_interrupt(
        Input::<usize>::with_theme(&w.theme)
            .with_prompt("Start row")
            .default(1)
            .interact_text(),
    )?
    else {
        return Ok(None);
    };
    let Some(end) = handle_interrupt(
        Input::<usize>::with_theme(&w.theme)
            .with_prompt("End row")
            .default(row_count.max(start))
            .interact_text(),
    )?
    else {
        return Ok(None);
    };

    Ok(Some(SelectionMode::Range { start, end }))
}

fn prompt_pick(w: &Wizard<'_>) -> anyhow::Result<Option<SelectionMode>> {
    let Some(dataset) = w.session.dataset() else {
        return Ok(None);
    };
    let checked: Vec<usize> = match w.session.selection() {
        Some(SelectionMode::Manual { indices }) => indices.clone(),
        _ => Vec::new(),
    };

    let labels: Vec<String> = dataset.rows().iter().map(row_label).collect();
    let defaults: Vec<bool> = dataset
        .rows()
        .iter()
        .map(|row| checked.contains(&row.number))
        .collect();

    let picked = MultiSelect::with_theme(&w.theme)
        .with_prompt(PICK_PROMPT)
        .items(&labels)
        .defaults(&defaults)
        .interact_opt()?;

    Ok(picked.map(|picked| SelectionMode::Manual {
        indices: picked.into_iter().map(|i| i + 1).collect(),
    }))
}

fn prompt_typed(w: &Wizard<'_>) -> anyhow::Result<Option<SelectionMode>> {
    let Some(raw) = handle_interrupt(
        Input::<String>::with_theme(&w.theme)
            .with_prompt("Rows")
            .allow_empty(true)
            .interact_text(),
    )?
    else {
        return Ok(None);
    };

    match raw.parse::<SelectionMode>() {
        Ok(mode) => Ok(Some(mode)),
        Err(e) => {
            print_error(e);
            Ok(None)
        }
    }
}

#[derive(Clone, Copy)]
enum QuestionAction {
    Ask,
    ChangeProvider,
    Back,
    Quit,
}

/// Step 3: ask a question and print one answer per selected email.
pub(super) async fn question(w: &mut Wizard<'_>) -> anyhow::Result<Flow> {
    let actions = [
        ("Ask a question", QuestionAction::Ask),
        ("Change LLM provider", QuestionAction::ChangeProvider),
        ("Back", QuestionAction::Back),
        ("Quit", QuestionAction::Quit),
    ];
    let Some(action) = choose(w, "Question", &actions)? else {
        return Ok(Flow::Quit);
    };

    match action {
        QuestionAction::Ask => {}
        QuestionAction::ChangeProvider => {
            if let Some(generator) = provider::choose_generator(w.config, &w.theme)? {
                print_success(format!("Using {}", generator.provider_name()));
                w.generator = Some(generator);
            }
            return Ok(Flow::Stay);
        }
        QuestionAction::Back => return Ok(Flow::Back),
        QuestionAction::Quit => return Ok(Flow::Quit),
    }

    let Some(question) = handle_interrupt(
        Input::<String>::with_theme(&w.theme)
            .with_prompt("Question")
            .allow_empty(true)
            .interact_text(),
    )?
    else {
        return Ok(Flow::Stay);
    };

    let labels: Vec<String> = Verbosity::ALL.iter().map(|v| v.to_string()).collect();
    let default = Verbosity::ALL
        .iter()
        .position(|v| *v == w.verbosity)
        .unwrap_or(1);
    let Some(choice) = Select::with_theme(&w.theme)
        .with_prompt("Answer length")
        .items(&labels)
        .default(default)
        .interact_opt()?
    else {
        return Ok(Flow::Stay);
    };
    w.verbosity = Verbosity::ALL[choice];

    if w.generator.is_none() {
        w.generator = provider::choose_generator(w.config, &w.theme)?;
    }
    let Some(generator) = w.generator.as_ref() else {
        print_note("No LLM provider configured");
        return Ok(Flow::Stay);
    };

    if let Err(e) = generator.ensure_available().await {
        print_error(e);
        return Ok(Flow::Stay);
    }

    let query = Query::new(question, w.verbosity);
    let options = BatchOptions::from_config(&w.config.batch);
    let total = w.session.selected_rows().map(|rows| rows.len()).unwrap_or(0);

    let progress = create_progress_bar(total as u64);
    let mut writer = OutputWriter::new(io::stdout(), OutputFormat::Text, false);
    let mut write_error: Option<io::Error> = None;

    let outcome = w
        .session
        .answer(generator, &query, &options, |outcome| {
            if let RowOutcome::Answered(result) = outcome {
                if write_error.is_none() {
                    if let Err(e) = progress.suspend(|| writer.write(result)) {
                        write_error = Some(e);
                    }
                }
            }
            progress.inc(1);
        })
        .await;

    progress.finish_and_clear();
    writer.flush()?;
    if let Some(e) = write_error {
        print_error(format!("Failed to print answers: {e}"));
    }

    match outcome {
        Ok(report) => print_success(summary(&report)),
        Err(e) => print_error(e),
    }
    Ok(Flow::Stay)
}

/// Show a menu of `(label, action)` pairs. `None` on Esc / Ctrl+C.
fn choose<A: Copy>(
    w: &Wizard<'_>,
    prompt: &str,
    actions: &[(&str, A)],
) -> anyhow::Result<Option<A>> {
    let labels: Vec<&str> = actions.iter().map(|(label, _)| *label).collect();
    let choice = Select::with_theme(&w.theme)
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact_opt()?;
    Ok(choice.map(|i| actions[i].1))
}

fn show_rows(w: &Wizard<'_>, selection: Option<&SelectionMode>, limit: Option<usize>) {
    let Some(dataset) = w.session.dataset() else {
        return;
    };
    match preview::preview_rows(dataset, selection, limit) {
        Ok(rows) => render_to_stderr(w, &rows),
        Err(e) => print_error(e),
    }
}

fn render_to_stderr(w: &Wizard<'_>, rows: &[&Row]) {
    let Some(dataset) = w.session.dataset() else {
        return;
    };
    let mut err = io::stderr().lock();
    if let Err(e) = preview::render(dataset, rows, &mut err).and_then(|_| writeln!(err)) {
        tracing::debug!("Preview output failed: {e}");
    }
}

fn describe(mode: &SelectionMode) -> String {
    match mode {
        SelectionMode::All => "all emails".to_string(),
        SelectionMode::Range { start, end } => format!("rows {start} to {end}"),
        SelectionMode::Manual { indices } if indices.is_empty() => "nothing".to_string(),
        SelectionMode::Manual { .. } => format!("rows {mode}"),
    }
}

/// `"  12  Hi, when is the invoice due?"`, truncated to one line.
fn row_label(row: &Row) -> String {
    let text = row.text().unwrap_or("(no text)");
    let first_line = text.lines().next().unwrap_or_default();
    let mut snippet: String = first_line.chars().take(SNIPPET_CHARS).collect();
    if first_line.chars().count() > SNIPPET_CHARS || text.lines().nth(1).is_some() {
        snippet.push('…');
    }
    format!("{:>4}  {snippet}", row.number)
}

fn summary(report: &BatchReport) -> String {
    let mut line = format!("{} answered", report.results.len());
    if !report.skipped.is_empty() {
        line.push_str(&format!(", {} skipped (no text)", report.skipped.len()));
    }
    if !report.failures.is_empty() {
        line.push_str(&format!(", {} failed", report.failures.len()));
    }
    line.push_str(&format!(", {} tokens", report.tokens_used));
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailqa_core::{AnswerResult, Dataset, RowFailure};

    #[test]
    fn row_labels_are_single_line() {
        let ds = Dataset::from_texts(
            [
                Some("Hi, when is the invoice due?".to_string()),
                Some("Line one\nLine two".to_string()),
                Some("x".repeat(80)),
                None,
            ],
            "Email Body",
        );
        let labels: Vec<String> = ds.rows().iter().map(row_label).collect();

        assert_eq!(labels[0], "   1  Hi, when is the invoice due?");
        assert_eq!(labels[1], "   2  Line one…");
        assert_eq!(labels[2], format!("   3  {}…", "x".repeat(SNIPPET_CHARS)));
        assert_eq!(labels[3], "   4  (no text)");
    }

    #[test]
    fn picker_points_to_typed_order() {
        assert!(TYPE_ROWS_LABEL.starts_with("Type row numbers"));
        assert!(PICK_PROMPT.contains("\"Type row numbers\""));
        let typed: SelectionMode = "3,1".parse().unwrap();
        assert_eq!(typed, SelectionMode::Manual { indices: vec![3, 1] });
    }

    #[test]
    fn selection_descriptions() {
        assert_eq!(describe(&SelectionMode::All), "all emails");
        assert_eq!(
            describe(&SelectionMode::Range { start: 2, end: 4 }),
            "rows 2 to 4"
        );
        assert_eq!(
            describe(&SelectionMode::Manual { indices: vec![3, 1] }),
            "rows 3,1"
        );
        assert_eq!(
            describe(&SelectionMode::Manual { indices: vec![] }),
            "nothing"
        );
    }

    #[test]
    fn summary_mentions_only_what_happened() {
        let mut report = BatchReport {
            results: vec![AnswerResult {
                row: 1,
                email: "e".to_string(),
                answer: "a".to_string(),
                tokens_used: Some(7),
                model: "m".to_string(),
            }],
            tokens_used: 7,
            ..Default::default()
        };
        assert_eq!(summary(&report), "1 answered, 7 tokens");

        report.skipped.push(2);
        report.failures.push(RowFailure {
            row: 3,
            error: "boom".to_string(),
            status_code: None,
        });
        assert_eq!(
            summary(&report),
            "1 answered, 1 skipped (no text), 1 failed, 7 tokens"
        );
    }
}
