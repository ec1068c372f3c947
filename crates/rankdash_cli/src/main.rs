//! `rankdash` command-line entry point.
//!
//! # Responsibility
//! - Parse flags and hand off to command execution.
//! - Report failures on stderr with a non-zero exit code.

use clap::Parser;

mod cli;
mod commands;
mod dashboard;
mod forms;

fn main() {
    let cli = cli::Cli::parse();
    if let Err(error) = commands::run(cli) {
        eprintln!("rankdash error: {error}");
        std::process::exit(1);
    }
}
