//! Prompt theme, banner and status lines for interactive mode.
//!
//! Everything is drawn on stderr so answers on stdout stay pipeable.

use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// The dialoguer theme used by every prompt in the wizard.
pub fn mailqa_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("?".to_string()).for_stderr().magenta(),
        prompt_style: Style::new().for_stderr().bold(),
        prompt_suffix: style("›".to_string()).for_stderr().bright().black(),
        active_item_prefix: style("▸".to_string()).for_stderr().magenta(),
        active_item_style: Style::new().for_stderr().magenta(),
        checked_item_prefix: style("[x]".to_string()).for_stderr().green(),
        unchecked_item_prefix: style("[ ]".to_string()).for_stderr().bright().black(),
        success_prefix: style("✓".to_string()).for_stderr().green(),
        success_suffix: style("·".to_string()).for_stderr().bright().black(),
        error_prefix: style("✗".to_string()).for_stderr().red(),
        error_style: Style::new().for_stderr().red(),
        values_style: Style::new().for_stderr().green(),
        ..ColorfulTheme::default()
    }
}

/// Print the version banner.
pub fn print_banner() {
    let version_line = format!("mailqa v{}", mailqa_core::VERSION);
    let tagline = "Question answering over your emails";
    let inner_width = tagline.len() + 4;

    let magenta = Style::new().for_stderr().magenta();

    eprintln!();
    eprintln!("{}", magenta.apply_to(format!("  ╔{:═<inner_width$}╗", "")));
    eprintln!("{}", magenta.apply_to(format!("  ║{version_line:^inner_width$}║")));
    eprintln!("{}", magenta.apply_to(format!("  ║{tagline:^inner_width$}║")));
    eprintln!("{}", magenta.apply_to(format!("  ╚{:═<inner_width$}╝", "")));
    eprintln!();
}

/// Print a step heading.
pub fn print_step(title: &str) {
    let bold = Style::new().for_stderr().bold().magenta();
    eprintln!();
    eprintln!("  {}", bold.apply_to(title));
    eprintln!();
}

/// Print an error without leaving the wizard.
pub fn print_error(message: impl std::fmt::Display) {
    let red = Style::new().for_stderr().red();
    eprintln!("  {} {message}", red.apply_to("✗"));
}

pub fn print_success(message: impl std::fmt::Display) {
    let green = Style::new().for_stderr().green();
    eprintln!("  {} {message}", green.apply_to("✓"));
}

pub fn print_note(message: impl std::fmt::Display) {
    let dim = Style::new().for_stderr().dim();
    eprintln!("  {}", dim.apply_to(message.to_string()));
}
