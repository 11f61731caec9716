//! Interactive mode: the guided upload → select → question flow.
//!
//! The wizard owns a `Session` and moves it between steps with Back/Next.
//! Every error is shown and the current step re-prompted; only Quit (or
//! Esc / Ctrl+C on a step menu) leaves the wizard.

mod provider;
mod steps;
pub mod theme;

use dialoguer::theme::ColorfulTheme;
use mailqa_core::{AnswerGenerator, Config, Session, Step, Verbosity};

/// Convert a dialoguer result into `Ok(Some(value))` on success, `Ok(None)` on
/// interrupt (Ctrl+C / terminal disconnect), and `Err` for other I/O failures.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// What a step asks the wizard to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Stay,
    Next,
    Back,
    Quit,
}

/// State shared by the steps for one interactive run.
struct Wizard<'a> {
    config: &'a Config,
    theme: ColorfulTheme,
    session: Session,
    /// Created on first use in the question step
    generator: Option<AnswerGenerator>,
    verbosity: Verbosity,
}

/// Entry point for `mailqa interactive`.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    theme::print_banner();

    let mut wizard = Wizard {
        config,
        theme: theme::mailqa_theme(),
        session: Session::new(),
        generator: None,
        verbosity: Verbosity::default(),
    };
    let mut shown: Option<Step> = None;

    loop {
        let step = wizard.session.step();
        if shown != Some(step) {
            theme::print_step(step.title());
            shown = Some(step);
        }

        let flow = match step {
            Step::Upload => steps::upload(&mut wizard)?,
            Step::Select => steps::select(&mut wizard)?,
            Step::Question => steps::question(&mut wizard).await?,
        };

        match flow {
            Flow::Next => {
                if let Err(e) = wizard.session.next() {
                    theme::print_error(e);
                }
            }
            Flow::Back => {
                wizard.session.back();
            }
            Flow::Stay => {}
            Flow::Quit => break,
        }
    }

    Ok(())
}
