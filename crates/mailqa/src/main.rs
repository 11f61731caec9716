//! mailqa CLI - ask one question of every email in a spreadsheet.
//!
//! mailqa loads a CSV or Excel file of emails, lets you pick which rows to
//! use, and asks an LLM the same question about each one. Answers are
//! printed as text or written as JSON/JSONL.
//!
//! # Usage
//!
//! ```bash
//! # Ask about every email in a file
//! mailqa ask emails.csv --question "What is being asked?"
//!
//! # Only rows 2 to 5, short answers, JSONL to a file
//! mailqa ask emails.xlsx -q "Who is the sender?" --rows 2-5 --verbosity short \
//!     --format jsonl --output answers.jsonl
//!
//! # Look at the data first
//! mailqa preview emails.csv --limit 5
//!
//! # Guided three-step flow
//! mailqa interactive
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// mailqa - ask questions about a spreadsheet of emails, one LLM answer per row.
#[derive(Parser, Debug)]
#[command(name = "mailqa")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a question for each selected email in a file
    Ask(cli::ask::AskArgs),

    /// Show the rows of a file (optionally only a selection)
    Preview(cli::preview::PreviewArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),

    /// Guided upload → select → question flow
    Interactive,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't up yet, so config warnings go through eprintln.
    let config = match mailqa_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `mailqa config path`."
            );
            mailqa_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("mailqa v{}", mailqa_core::VERSION);

    match cli.command {
        Commands::Ask(args) => cli::ask::execute(args, config).await,
        Commands::Preview(args) => cli::preview::execute(args, &config),
        Commands::Config(args) => cli::config::execute(args).await,
        Commands::Interactive => cli::interactive::run(&config).await,
    }
}
